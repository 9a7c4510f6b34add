use crate::app::controller::AppController;
use crate::config::Config;
use crate::error::Result;

/// Entry point used by `main` once configuration and logging are in place.
pub fn run(config: Config) -> Result<()> {
    let controller = AppController::new(config);
    controller.run()
}
