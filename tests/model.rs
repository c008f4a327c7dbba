use accidata::model::{
    Classifier,
    DecisionTreeBuilder,
    Pca,
    RandomForest,
    Transformer,
};


// Toy example  (o/x are the two classes)
//
// 15|                     |
//   |                   5 |
//   |                  x  |
//   |                     |         6
//   |                     |        x
// 10|       4             |
//   |      x              |             1
//   |                     |            o
//   |                     |
//   |                     |   0
//  5|                     |  o
//   |                     |                 2
//   |                     |                o
//   |            3        |
//   |           x         |
//   |_____________________|____________________
//  0            5         | 10            15
//                         |
//                        9.0
//
// A single vertical split at 9.0 misses point 6;
// the full tree needs one more split to carve it out.
fn toy_points() -> (Vec<Vec<f64>>, Vec<i64>) {
    let features = vec![
        vec![10.0,  5.0],
        vec![14.0,  8.0],
        vec![15.0,  3.0],
        vec![ 5.0,  1.0],
        vec![ 3.0,  9.0],
        vec![ 8.0, 13.0],
        vec![12.0, 11.0],
    ];
    let labels = vec![1, 1, 1, -1, -1, -1, -1];
    (features, labels)
}


// Two tight blobs, far apart in both coordinates.
fn blob_points() -> (Vec<Vec<f64>>, Vec<i64>) {
    let features = vec![
        vec![ 0.0,  0.2],
        vec![ 0.3,  0.0],
        vec![-0.2,  0.4],
        vec![ 0.1, -0.3],
        vec![10.0, 10.2],
        vec![10.3,  9.8],
        vec![ 9.7, 10.4],
        vec![10.1,  9.9],
    ];
    let labels = vec![0, 0, 0, 0, 1, 1, 1, 1];
    (features, labels)
}


#[test]
fn a_full_tree_separates_the_toy_points() {
    let (features, labels) = toy_points();

    let mut tree = DecisionTreeBuilder::new().build();
    tree.fit(&features, &labels);

    let predictions = tree.predict(&features);
    assert_eq!(predictions, labels);
}


#[test]
fn a_stump_stays_coarse() {
    let (features, labels) = toy_points();

    let mut stump = DecisionTreeBuilder::new().max_depth(1).build();
    stump.fit(&features, &labels);

    // One split cannot carve out the upper-right x,
    // so exactly one toy point stays misclassified.
    let predictions = stump.predict(&features);
    let hits = predictions.iter()
        .zip(&labels)
        .filter(|(p, l)| p == l)
        .count();
    assert_eq!(hits, labels.len() - 1);
}


#[test]
fn an_unfitted_tree_predicts_the_default_class() {
    let tree = DecisionTreeBuilder::new().build();
    assert_eq!(tree.predict_row(&[1.0, 2.0]), 0);
}


#[test]
fn a_forest_separates_the_blobs() {
    let (features, labels) = blob_points();

    let mut forest = RandomForest::new()
        .n_trees(25)
        .seed(42);
    forest.fit(&features, &labels);

    assert_eq!(forest.n_fitted_trees(), 25);
    assert_eq!(forest.name(), "RandomForest");

    let predictions = forest.predict(&features);
    assert_eq!(predictions, labels);
}


#[test]
fn an_identical_seed_grows_an_identical_forest() {
    let (features, labels) = blob_points();

    let grid = vec![
        vec![1.0, 1.0],
        vec![5.0, 5.0],
        vec![9.0, 9.0],
        vec![2.0, 8.0],
    ];

    let mut first = RandomForest::new().n_trees(15).seed(7);
    first.fit(&features, &labels);

    let mut second = RandomForest::new().n_trees(15).seed(7);
    second.fit(&features, &labels);

    assert_eq!(first.predict(&grid), second.predict(&grid));
}


#[test]
fn pca_keeps_the_shape_and_orders_by_variance() {
    let features = vec![
        vec![2.5, 2.4, 0.5],
        vec![0.5, 0.7, 1.1],
        vec![2.2, 2.9, 0.3],
        vec![1.9, 2.2, 0.9],
        vec![3.1, 3.0, 0.1],
        vec![2.3, 2.7, 0.6],
        vec![2.0, 1.6, 1.0],
        vec![1.0, 1.1, 1.2],
    ];

    let mut pca = Pca::new();
    let reduced = pca.fit_transform(&features);

    assert_eq!(reduced.len(), features.len());
    assert!(reduced.iter().all(|row| row.len() == 3));

    let ratio = pca.explained_variance_ratio();
    assert_eq!(ratio.len(), 3);

    let total = ratio.iter().sum::<f64>();
    assert!((total - 1.0).abs() < 1e-9);

    // Descending share of the variance.
    assert!(ratio.windows(2).all(|pair| pair[0] >= pair[1]));
}


#[test]
fn collinear_rows_load_on_a_single_component() {
    // Every row is a multiple of (1, 2),
    // so one direction carries all the variance.
    let features = (0..10)
        .map(|i| vec![i as f64, 2.0 * i as f64])
        .collect::<Vec<_>>();

    let mut pca = Pca::new();
    pca.fit_transform(&features);

    assert!(pca.explained_variance_ratio()[0] > 0.999);
}


#[test]
fn transform_reprojects_like_fit_transform() {
    let features = vec![
        vec![1.0, 0.5],
        vec![2.0, 1.9],
        vec![3.0, 2.1],
        vec![4.0, 4.2],
    ];

    let mut pca = Pca::new();
    let fitted = pca.fit_transform(&features);
    let applied = pca.transform(&features);

    assert_eq!(fitted, applied);
}


#[test]
fn components_are_unit_length() {
    let (features, _) = blob_points();

    let mut pca = Pca::new();
    pca.fit_transform(&features);

    for component in pca.components() {
        let norm = component.iter()
            .map(|x| x * x)
            .sum::<f64>()
            .sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }
}
