use serde::{Deserialize, Serialize};

/// Optional annotations attached to a saved Network.
/// All fields are Option<> so models saved without metadata deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub description: Option<String>,
    /// Number of feature values each input row carries.
    pub input_width: Option<usize>,
    /// Class labels for the output layer, indexed by output position.
    pub output_labels: Option<Vec<String>>,
}
