use std::path::{Path, PathBuf};

use crossterm::style::Stylize;
use log::{info, warn};

use crate::config::Config;
use crate::distribution::{Distribution, Species};
use crate::error::{AppError, Result};
use crate::export::{save_chart_image, write_workbook};
use crate::ui::{
    prompt_number, prompt_text, save_file_explorer, select_multiple_options, select_option,
    show_chart, UiOptions,
};
use crate::utils::default_start_dir;

const CONTINUE: &str = "🧪 Continue";
const QUIT: &str = "🚪 Quit";

/// What to do with a freshly computed diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartAction {
    Show,
    Save,
    Export,
}

impl ChartAction {
    pub const ALL: [ChartAction; 3] = [ChartAction::Show, ChartAction::Save, ChartAction::Export];

    pub fn label(self) -> &'static str {
        match self {
            ChartAction::Show => "Show chart",
            ChartAction::Save => "Save chart",
            ChartAction::Export => "Export to Excel file",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.label() == label)
    }
}

/// Runs the compute → act → continue loop on top of the interactive prompts.
pub struct AppController {
    config: Config,
    ui: UiOptions,
}

impl AppController {
    pub fn new(config: Config) -> Self {
        let ui = UiOptions::from(&config);
        Self { config, ui }
    }

    pub fn run(&self) -> Result<()> {
        print_banner();
        loop {
            self.run_round()?;

            let options = vec![CONTINUE.to_string(), QUIT.to_string()];
            let choice = select_option(&options, Some("What would you like to do next?"), &self.ui)?;
            if choice == QUIT {
                println!("{}", "Goodbye! 👋".cyan().bold());
                return Ok(());
            }
        }
    }

    fn run_round(&self) -> Result<()> {
        let species = self.ask_species()?;
        let pka = prompt_number("pKA", "Enter the pKA of the acid", &self.ui)?;
        let distribution = Distribution::compute(pka, &self.config.ph_values());
        info!(
            "computed {} points for pKA {pka} ({} / {})",
            distribution.points.len(),
            species.acid,
            species.base
        );
        println!("{}", "✓ Chart generated".green());

        let actions = self.select_actions()?;
        // Saving and exporting go first so the blocking viewer is the last step.
        if actions.contains(&ChartAction::Save) {
            report(self.save_image(&distribution, &species))?;
        }
        if actions.contains(&ChartAction::Export) {
            report(self.export_workbook(&distribution, &species))?;
        }
        if actions.contains(&ChartAction::Show) {
            show_chart(&distribution, &species, &self.ui)?;
        }
        Ok(())
    }

    fn ask_species(&self) -> Result<Species> {
        let labels = &self.config.labels;
        let acid = prompt_text("Acid", "Name of the acid", Some(labels.acid.as_str()), &self.ui)?;
        let base = prompt_text("Base", "Name of the conjugate base", Some(labels.base.as_str()), &self.ui)?;
        Ok(Species::new(acid, base))
    }

    fn select_actions(&self) -> Result<Vec<ChartAction>> {
        let options: Vec<String> = ChartAction::ALL
            .iter()
            .map(|action| action.label().to_string())
            .collect();
        let chosen = select_multiple_options(&options, Some("What should happen with the chart?"), &self.ui)?;
        Ok(chosen
            .iter()
            .filter_map(|label| ChartAction::from_label(label))
            .collect())
    }

    fn save_image(&self, distribution: &Distribution, species: &Species) -> Result<()> {
        let export = &self.config.export;
        let Some(path) = self.choose_destination(&export.image_name)? else {
            return Ok(());
        };
        save_chart_image(&path, distribution, species, export.image_width, export.image_height)?;
        println!("{}", format!("✓ Chart saved to {}", path.display()).green());
        Ok(())
    }

    fn export_workbook(&self, distribution: &Distribution, species: &Species) -> Result<()> {
        let Some(path) = self.choose_destination(&self.config.export.workbook_name)? else {
            return Ok(());
        };
        write_workbook(&path, &distribution.ph_values(), distribution.pka, species)?;
        println!("{}", format!("✓ Data exported to {}", path.display()).green());
        Ok(())
    }

    fn choose_destination(&self, default_name: &str) -> Result<Option<PathBuf>> {
        let start = self.start_dir();
        let chosen = save_file_explorer(default_name, &start, &self.ui)?;
        if chosen.is_none() {
            println!("{}", "Save cancelled".yellow());
        }
        Ok(chosen)
    }

    fn start_dir(&self) -> PathBuf {
        match &self.config.browser.start_dir {
            Some(dir) if Path::new(dir).is_dir() => dir.clone(),
            Some(dir) => {
                warn!("configured start_dir {} is not a directory", dir.display());
                default_start_dir()
            }
            None => default_start_dir(),
        }
    }
}

/// Print a failed save/export inline and keep the session going.
///
/// Terminal-level failures still abort the session.
fn report(outcome: Result<()>) -> Result<()> {
    match outcome {
        Ok(()) => Ok(()),
        Err(err @ (AppError::Interrupted | AppError::NoTerminal | AppError::SessionBusy)) => Err(err),
        Err(err) => {
            warn!("export failed: {err}");
            eprintln!("{}", format!("✗ {err}").red());
            Ok(())
        }
    }
}

fn print_banner() {
    println!("{}", "⚗  Titration distribution diagrams".magenta().bold());
    println!(
        "{}",
        "Plot acid/base percentages against pH for a given pKA.".dim()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_back_to_actions() {
        for action in ChartAction::ALL {
            assert_eq!(ChartAction::from_label(action.label()), Some(action));
        }
        assert_eq!(ChartAction::from_label("Print chart"), None);
    }

    #[test]
    fn export_failures_are_reported_not_propagated() {
        let failed: Result<()> = Err(AppError::message("disk full"));
        assert!(report(failed).is_ok());
    }

    #[test]
    fn interrupt_still_aborts_the_session() {
        let interrupted: Result<()> = Err(AppError::Interrupted);
        assert!(matches!(report(interrupted), Err(AppError::Interrupted)));
    }

    #[test]
    fn terminal_failures_still_abort_the_session() {
        let no_terminal: Result<()> = Err(AppError::NoTerminal);
        assert!(matches!(report(no_terminal), Err(AppError::NoTerminal)));
        let busy: Result<()> = Err(AppError::SessionBusy);
        assert!(matches!(report(busy), Err(AppError::SessionBusy)));
    }

    #[test]
    fn missing_start_dir_falls_back() {
        let mut config = Config::builtin();
        config.browser.start_dir = Some(PathBuf::from("/definitely/not/here"));
        let controller = AppController::new(config);
        assert_eq!(controller.start_dir(), default_start_dir());
    }

    #[test]
    fn configured_start_dir_is_used() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut config = Config::builtin();
        config.browser.start_dir = Some(dir.path().to_path_buf());
        let controller = AppController::new(config);
        assert_eq!(controller.start_dir(), dir.path());
    }
}
