use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::{filter_from_codes, FilterState};
use crate::data::model::Probe;
use crate::export::RenderOptions;

const LOGGING_HELP: &str = "Diagnostics, including the notice when a directory holds no images \
for the chosen probe, are written to stdout at warn level. RUST_LOG defaults to info; \
RUST_LOG=error or off hides them.";

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Probe-filtered MRI image grid viewer",
    after_help = LOGGING_HELP
)]
pub struct Cli {
    /// Directory holding the `.tif` images
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Probe to show: p1 (3FDG, files 712*) or p2 (3FDGal, files 711*)
    #[arg(short, long, default_value = "p2")]
    pub probe: Probe,

    /// Write the figure to this PNG (plus a .json layout manifest) and exit
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Only show these timepoint codes (e.g. t1); repeatable
    #[arg(long = "timepoint", value_name = "CODE")]
    pub timepoints: Vec<String>,

    /// Only show these metabolite codes (e.g. m3); repeatable
    #[arg(long = "metabolite", value_name = "CODE")]
    pub metabolites: Vec<String>,

    /// Exported panel width in pixels
    #[arg(long, default_value_t = 320)]
    pub cell_width: u32,

    /// Exported panel height in pixels
    #[arg(long, default_value_t = 400)]
    pub cell_height: u32,
}

impl Cli {
    pub fn filters(&self) -> FilterState {
        filter_from_codes(&self.timepoints, &self.metabolites)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            ..RenderOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterField;
    use clap::CommandFactory;

    #[test]
    fn defaults_to_p2() {
        let cli = Cli::try_parse_from(["mri-viewer", "--dir", "imgs"]).unwrap();
        assert_eq!(cli.probe, Probe::P2);
        assert_eq!(cli.dir, Some(PathBuf::from("imgs")));
        assert!(cli.filters().is_empty());
        assert_eq!(cli.render_options().cell_width, 320);
    }

    #[test]
    fn rejects_unknown_probe() {
        assert!(Cli::try_parse_from(["mri-viewer", "--probe", "p3"]).is_err());
    }

    #[test]
    fn repeatable_filters() {
        let cli = Cli::try_parse_from([
            "mri-viewer",
            "-p",
            "P1",
            "--timepoint",
            "t1",
            "--timepoint",
            "t3",
            "--metabolite",
            "m4",
            "--export",
            "out.png",
        ])
        .unwrap();
        assert_eq!(cli.probe, Probe::P1);
        let filters = cli.filters();
        assert_eq!(filters[&FilterField::Timepoint].len(), 2);
        assert!(filters[&FilterField::Metabolite].contains("m4"));
        assert_eq!(cli.export, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn help_mentions_log_filter() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("RUST_LOG=error"));
        assert!(help.contains("warn level"));
    }
}
