// ⚙️ Analysis configuration
//
// Defaults reproduce the standard survey package layout:
//   data_package/{households,expenses,products}.csv → output/

use crate::inequality::LorenzConvention;
use crate::loader::TablePaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub convention: LorenzConvention,
    /// Decimals kept for the percentage column of the share table
    pub share_decimals: u32,
    /// Population fraction used for the bottom-share statistic
    pub bottom_share_fraction: f64,
    pub render_plot: bool,
}

impl AnalysisConfig {
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        AnalysisConfig {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_convention(mut self, convention: LorenzConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn without_plot(mut self) -> Self {
        self.render_plot = false;
        self
    }

    pub fn table_paths(&self) -> TablePaths {
        TablePaths::in_dir(&self.data_dir)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            data_dir: PathBuf::from("data_package"),
            output_dir: PathBuf::from("output"),
            convention: LorenzConvention::default(),
            share_decimals: 2,
            bottom_share_fraction: 0.5,
            render_plot: true,
        }
    }
}
