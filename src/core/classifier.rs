//! Survival model artifacts.
//!
//! The artifact is a JSON document tagged by `kind`. Its structure is checked
//! once at load time; inference itself never touches the file system.

use crate::domain::model::{FeatureVector, Verdict};
use crate::domain::ports::Classifier;
use crate::utils::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Logistic(LogisticModel),
    DecisionTree(DecisionTree),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: u8,
    },
}

impl ModelArtifact {
    /// Read and check an artifact from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let display = path.as_ref().display().to_string();
        let content = std::fs::read_to_string(&path).map_err(|e| PredictorError::ModelLoadError {
            path: display.clone(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content).map_err(|e| PredictorError::ModelLoadError {
            path: display,
            message: e.to_string(),
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(content)?;
        artifact.check()?;
        Ok(artifact)
    }

    fn check(&self) -> Result<()> {
        match self {
            ModelArtifact::Logistic(model) => {
                if model.weights.len() != FeatureVector::LEN {
                    return Err(PredictorError::ConfigError {
                        message: format!(
                            "logistic model needs {} weights, found {}",
                            FeatureVector::LEN,
                            model.weights.len()
                        ),
                    });
                }
                if !(0.0..=1.0).contains(&model.threshold) {
                    return Err(PredictorError::ConfigError {
                        message: format!("threshold {} is outside [0, 1]", model.threshold),
                    });
                }
                Ok(())
            }
            ModelArtifact::DecisionTree(tree) => {
                if tree.nodes.is_empty() {
                    return Err(PredictorError::ConfigError {
                        message: "decision tree has no nodes".to_string(),
                    });
                }
                for (index, node) in tree.nodes.iter().enumerate() {
                    match *node {
                        TreeNode::Split {
                            feature,
                            left,
                            right,
                            ..
                        } => {
                            if feature >= FeatureVector::LEN {
                                return Err(PredictorError::ConfigError {
                                    message: format!("node {} splits on unknown feature {}", index, feature),
                                });
                            }
                            if left >= tree.nodes.len() || right >= tree.nodes.len() {
                                return Err(PredictorError::ConfigError {
                                    message: format!("node {} points outside the tree", index),
                                });
                            }
                        }
                        TreeNode::Leaf { leaf } => {
                            if Verdict::from_label(leaf).is_none() {
                                return Err(PredictorError::ConfigError {
                                    message: format!("node {} has non-binary label {}", index, leaf),
                                });
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

impl LogisticModel {
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let z = self
            .weights
            .iter()
            .zip(features.as_array())
            .fold(self.intercept, |acc, (w, x)| acc + w * x);
        1.0 / (1.0 + (-z).exp())
    }
}

impl Classifier for LogisticModel {
    fn predict(&self, features: &FeatureVector) -> Result<Verdict> {
        let p = self.probability(features);
        if p.is_nan() {
            return Err(PredictorError::inference(format!(
                "logistic score is not a number for features {:?}",
                features.as_array()
            )));
        }
        Ok(if p >= self.threshold {
            Verdict::Survived
        } else {
            Verdict::DidNotSurvive
        })
    }
}

impl Classifier for DecisionTree {
    fn predict(&self, features: &FeatureVector) -> Result<Verdict> {
        let x = features.as_array();
        let mut index = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { leaf }) => {
                    return Verdict::from_label(*leaf).ok_or_else(|| {
                        PredictorError::inference(format!("leaf {} has label {}", index, leaf))
                    });
                }
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = x.get(*feature).ok_or_else(|| {
                        PredictorError::inference(format!("unknown feature {}", feature))
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(PredictorError::inference(format!(
                        "node {} does not exist",
                        index
                    )))
                }
            }
        }
        Err(PredictorError::inference(
            "decision tree traversal did not reach a leaf",
        ))
    }
}

impl Classifier for ModelArtifact {
    fn predict(&self, features: &FeatureVector) -> Result<Verdict> {
        match self {
            ModelArtifact::Logistic(model) => model.predict(features),
            ModelArtifact::DecisionTree(tree) => tree.predict(features),
        }
    }
}
