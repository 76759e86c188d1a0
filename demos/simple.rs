//! DBSCAN over a small 2D dataset with each kind of distance metric.

use dbscan_clusterer::{cluster, ClusterAssignment, Metric};

fn report(title: &str, data: &[Vec<f64>], fit: &ClusterAssignment) {
    println!("=== {} ===", title);
    for (id, members) in fit.clusters().iter().enumerate() {
        let points: Vec<_> = members.iter().map(|&i| (data[i][0], data[i][1])).collect();
        println!("  cluster {} => {:?}", id, points);
    }
    let noise: Vec<_> = fit.noise().iter().map(|&i| (data[i][0], data[i][1])).collect();
    println!("  NOISE => {:?}", noise);
}

fn main() {
    let data: Vec<Vec<f64>> = vec![
        vec![0.0, 10.0],
        vec![0.0, 11.0],
        vec![0.0, 12.0],
        vec![20.0, 33.0],
        vec![21.0, 32.0],
        vec![59.0, 77.0],
        vec![58.0, 79.0],
        vec![58.0, 76.0],
        vec![300.0, 70.0],
        vec![500.0, 300.0],
        vec![500.0, 302.0],
    ];

    let fit = cluster(&data, 2, 4.0, Metric::default()).unwrap();
    report("default metric (eps=4, min_pts=2)", &data, &fit);

    let metric: Metric = "euclidean2d".parse().unwrap();
    let fit = cluster(&data, 2, 4.0, metric).unwrap();
    report("euclidean2d (eps=4, min_pts=2)", &data, &fit);

    let manhattan = Metric::custom(|a, b| a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum());
    let fit = cluster(&data, 2, 4.0, manhattan).unwrap();
    report("custom manhattan (eps=4, min_pts=2)", &data, &fit);
}
