use crate::error::{PipelineError, Result};
use crate::ml::models::{ModelTrainingConfig, ModelType};
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters, SplitCriterion,
};

type Tree = DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Trait for classifiers
pub trait Classifier: Send + Sync {
    /// Fit on a feature matrix and class codes `0..k`
    fn fit(&mut self, features: &Array2<f64>, labels: &[usize]) -> Result<()>;

    /// Predict class codes
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>>;

    /// Per-class probabilities, one column per class code
    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>>;

    /// Number of classes seen during fitting
    fn n_classes(&self) -> usize;

    /// Feature width seen during fitting
    fn n_features(&self) -> usize;

    fn model_type(&self) -> ModelType;

    fn is_trained(&self) -> bool;
}

fn ndarray_to_densematrix(arr: &Array2<f64>) -> DenseMatrix<f64> {
    let shape = arr.shape();
    let data: Vec<f64> = arr.iter().copied().collect();
    DenseMatrix::new(shape[0], shape[1], data, false)
}

fn vec_to_labels(vec: &[usize]) -> Vec<i32> {
    vec.iter().map(|&x| x as i32).collect()
}

fn fit_tree(x: &DenseMatrix<f64>, y: &Vec<i32>, max_depth: Option<u16>) -> Result<Tree> {
    let mut params = DecisionTreeClassifierParameters::default().with_criterion(SplitCriterion::Gini);
    if let Some(depth) = max_depth {
        params = params.with_max_depth(depth);
    }

    DecisionTreeClassifier::fit(x, y, params)
        .map_err(|e| PipelineError::Training(format!("Failed to train decision tree: {}", e)))
}

/// One fitted tree. A sample holding a single class cannot be split, so it
/// becomes a constant leaf.
#[derive(Serialize, Deserialize)]
enum Estimator {
    Tree(Tree),
    Constant(usize),
}

impl Estimator {
    fn fit(features: &Array2<f64>, labels: &[usize], max_depth: Option<u16>) -> Result<Self> {
        match labels.first() {
            Some(&first) if labels.iter().all(|&l| l == first) => Ok(Estimator::Constant(first)),
            _ => {
                let x = ndarray_to_densematrix(features);
                let y = vec_to_labels(labels);
                Ok(Estimator::Tree(fit_tree(&x, &y, max_depth)?))
            }
        }
    }

    fn predict(&self, x: &DenseMatrix<f64>, n_rows: usize) -> Result<Vec<usize>> {
        match self {
            Estimator::Constant(class) => Ok(vec![*class; n_rows]),
            Estimator::Tree(tree) => {
                let predictions = tree
                    .predict(x)
                    .map_err(|e| PipelineError::Training(format!("Prediction failed: {}", e)))?;
                Ok(predictions.iter().map(|&p| p.max(0) as usize).collect())
            }
        }
    }
}

/// Index of the largest value; ties go to the lowest index
fn argmax(values: ndarray::ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

fn check_fit_input(features: &Array2<f64>, labels: &[usize]) -> Result<usize> {
    if features.nrows() != labels.len() {
        return Err(PipelineError::shape_mismatch(
            format!("{} labels", features.nrows()),
            format!("{} labels", labels.len()),
        ));
    }
    if labels.is_empty() {
        return Err(PipelineError::EmptyDataset(
            "cannot fit a classifier on zero rows".to_string(),
        ));
    }
    Ok(labels.iter().max().map_or(0, |&m| m + 1))
}

/// A single CART tree fitted on the full training data
#[derive(Serialize, Deserialize)]
pub struct TreeClassifier {
    tree: Option<Estimator>,
    max_depth: Option<u16>,
    n_classes: usize,
    n_features: usize,
}

impl TreeClassifier {
    pub fn new(max_depth: Option<u16>) -> Self {
        Self {
            tree: None,
            max_depth,
            n_classes: 0,
            n_features: 0,
        }
    }

    fn trained_tree(&self) -> Result<&Estimator> {
        self.tree
            .as_ref()
            .ok_or_else(|| PipelineError::Training("Model not trained".to_string()))
    }
}

impl Classifier for TreeClassifier {
    fn fit(&mut self, features: &Array2<f64>, labels: &[usize]) -> Result<()> {
        let n_classes = check_fit_input(features, labels)?;

        self.tree = Some(Estimator::fit(features, labels, self.max_depth)?);
        self.n_classes = n_classes;
        self.n_features = features.ncols();

        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        let x = ndarray_to_densematrix(features);
        self.trained_tree()?.predict(&x, features.nrows())
    }

    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        let predictions = self.predict(features)?;
        let mut proba = Array2::zeros((predictions.len(), self.n_classes));

        for (i, &pred) in predictions.iter().enumerate() {
            if pred < self.n_classes {
                proba[[i, pred]] = 1.0;
            }
        }

        Ok(proba)
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn model_type(&self) -> ModelType {
        ModelType::DecisionTree
    }

    fn is_trained(&self) -> bool {
        self.tree.is_some()
    }
}

impl std::fmt::Debug for TreeClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeClassifier")
            .field("max_depth", &self.max_depth)
            .field("n_classes", &self.n_classes)
            .field("n_features", &self.n_features)
            .field("trained", &self.is_trained())
            .finish()
    }
}

/// Bootstrap-aggregated CART trees. Tree `i` is fitted on a sample drawn
/// with replacement using seed `random_state + i`; probabilities are the
/// fraction of trees voting for each class.
#[derive(Serialize, Deserialize)]
pub struct ForestClassifier {
    trees: Vec<Estimator>,
    n_estimators: usize,
    random_state: u64,
    max_depth: Option<u16>,
    n_classes: usize,
    n_features: usize,
}

impl ForestClassifier {
    pub fn new(n_estimators: usize, random_state: u64, max_depth: Option<u16>) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            random_state,
            max_depth,
            n_classes: 0,
            n_features: 0,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn bootstrap_indices(n: usize, seed: u64) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.gen_range(0..n)).collect()
    }
}

impl Classifier for ForestClassifier {
    fn fit(&mut self, features: &Array2<f64>, labels: &[usize]) -> Result<()> {
        let n_classes = check_fit_input(features, labels)?;
        let n = labels.len();

        let mut trees = Vec::with_capacity(self.n_estimators);
        for i in 0..self.n_estimators {
            let indices = Self::bootstrap_indices(n, self.random_state.wrapping_add(i as u64));
            let sample = features.select(Axis(0), &indices);
            let sample_labels: Vec<usize> = indices.iter().map(|&j| labels[j]).collect();
            trees.push(Estimator::fit(&sample, &sample_labels, self.max_depth)?);
        }

        tracing::debug!(trees = trees.len(), samples = n, "Forest fitted");

        self.trees = trees;
        self.n_classes = n_classes;
        self.n_features = features.ncols();
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        let proba = self.predict_proba(features)?;
        Ok(proba.rows().into_iter().map(argmax).collect())
    }

    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        if self.trees.is_empty() {
            return Err(PipelineError::Training("Model not trained".to_string()));
        }

        let x = ndarray_to_densematrix(features);
        let mut votes = Array2::<f64>::zeros((features.nrows(), self.n_classes));

        for tree in &self.trees {
            for (i, pred) in tree.predict(&x, features.nrows())?.into_iter().enumerate() {
                if pred < self.n_classes {
                    votes[[i, pred]] += 1.0;
                }
            }
        }

        votes /= self.trees.len() as f64;
        Ok(votes)
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn model_type(&self) -> ModelType {
        ModelType::RandomForest
    }

    fn is_trained(&self) -> bool {
        !self.trees.is_empty()
    }
}

impl std::fmt::Debug for ForestClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForestClassifier")
            .field("n_estimators", &self.n_estimators)
            .field("random_state", &self.random_state)
            .field("max_depth", &self.max_depth)
            .field("n_classes", &self.n_classes)
            .field("n_features", &self.n_features)
            .field("trees", &self.trees.len())
            .finish()
    }
}

/// A fitted classifier of any supported family, as persisted in the model artifact
#[derive(Debug, Serialize, Deserialize)]
pub enum TrainedModel {
    RandomForest(ForestClassifier),
    DecisionTree(TreeClassifier),
}

impl TrainedModel {
    /// Untrained classifier for the configured family
    pub fn from_config(config: &ModelTrainingConfig) -> Self {
        match config.model_type {
            ModelType::RandomForest => TrainedModel::RandomForest(ForestClassifier::new(
                config.n_estimators,
                config.random_state,
                config.max_depth,
            )),
            ModelType::DecisionTree => {
                TrainedModel::DecisionTree(TreeClassifier::new(config.max_depth))
            }
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            TrainedModel::RandomForest(model) => model,
            TrainedModel::DecisionTree(model) => model,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Classifier {
        match self {
            TrainedModel::RandomForest(model) => model,
            TrainedModel::DecisionTree(model) => model,
        }
    }
}

impl Classifier for TrainedModel {
    fn fit(&mut self, features: &Array2<f64>, labels: &[usize]) -> Result<()> {
        self.inner_mut().fit(features, labels)
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        self.inner().predict(features)
    }

    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        self.inner().predict_proba(features)
    }

    fn n_classes(&self) -> usize {
        self.inner().n_classes()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn model_type(&self) -> ModelType {
        self.inner().model_type()
    }

    fn is_trained(&self) -> bool {
        self.inner().is_trained()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Vec<usize>) {
        let features = array![
            [0.0, 0.1],
            [0.1, 0.0],
            [0.2, 0.1],
            [0.1, 0.2],
            [0.9, 1.0],
            [1.0, 0.9],
            [0.8, 0.9],
            [0.9, 0.8],
        ];
        (features, vec![0, 0, 0, 0, 1, 1, 1, 1])
    }

    #[test]
    fn test_tree_fits_separable_data() {
        let (features, labels) = separable();
        let mut tree = TreeClassifier::new(None);
        assert!(!tree.is_trained());

        tree.fit(&features, &labels).unwrap();
        assert!(tree.is_trained());
        assert_eq!(tree.n_classes(), 2);
        assert_eq!(tree.predict(&features).unwrap(), labels);

        let proba = tree.predict_proba(&features).unwrap();
        assert_eq!(proba.dim(), (8, 2));
        assert_eq!(proba[[0, 0]], 1.0);
    }

    #[test]
    fn test_forest_probabilities_are_vote_fractions() {
        let (features, labels) = separable();
        let mut forest = ForestClassifier::new(10, 2, None);
        forest.fit(&features, &labels).unwrap();

        assert_eq!(forest.n_trees(), 10);
        let proba = forest.predict_proba(&features).unwrap();
        for row in proba.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
            for &p in row {
                assert!((p * 10.0 - (p * 10.0).round()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_forest_same_seed_same_output() {
        let (features, labels) = separable();
        let probe = array![[0.5, 0.5], [0.4, 0.6], [0.05, 0.95]];

        let mut a = ForestClassifier::new(15, 7, None);
        let mut b = ForestClassifier::new(15, 7, None);
        a.fit(&features, &labels).unwrap();
        b.fit(&features, &labels).unwrap();

        assert_eq!(a.predict_proba(&probe).unwrap(), b.predict_proba(&probe).unwrap());
    }

    #[test]
    fn test_untrained_prediction_fails() {
        let forest = ForestClassifier::new(3, 0, None);
        assert!(forest.predict(&array![[0.0, 0.0]]).is_err());

        let tree = TreeClassifier::new(None);
        assert!(tree.predict(&array![[0.0, 0.0]]).is_err());
    }

    #[test]
    fn test_fit_rejects_bad_shapes() {
        let mut tree = TreeClassifier::new(None);
        let err = tree.fit(&Array2::zeros((5, 2)), &[0, 1, 0, 1]).unwrap_err();
        assert_eq!(err.error_code(), "SHAPE_MISMATCH");

        let err = tree.fit(&Array2::zeros((0, 2)), &[]).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_DATASET");
    }

    #[test]
    fn test_single_class_training_data() {
        let features = array![[0.0, 1.0], [1.0, 0.0], [0.5, 0.5]];
        let labels = vec![1, 1, 1];

        let mut forest = ForestClassifier::new(4, 3, None);
        forest.fit(&features, &labels).unwrap();
        assert_eq!(forest.predict(&features).unwrap(), labels);

        let proba = forest.predict_proba(&features).unwrap();
        assert_eq!(proba.dim(), (3, 2));
        assert!(proba.column(1).iter().all(|&p| p == 1.0));
    }

    #[test]
    fn test_argmax_ties_pick_lowest_index() {
        assert_eq!(argmax(array![0.5, 0.5].view()), 0);
        assert_eq!(argmax(array![0.2, 0.3, 0.3].view()), 1);
    }

    #[test]
    fn test_trained_model_dispatch() {
        let (features, labels) = separable();
        let mut config = ModelTrainingConfig::new(5, 1);
        config.model_type = ModelType::DecisionTree;

        let mut model = TrainedModel::from_config(&config);
        assert_eq!(model.model_type(), ModelType::DecisionTree);
        model.fit(&features, &labels).unwrap();
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.predict(&features).unwrap(), labels);
    }
}
