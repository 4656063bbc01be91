//! Plan command handler.

use color_eyre::Result;

use crate::container::Container;
use crate::web::application_sources;

use super::App;

impl App {
    /// Print the construction order without invoking any producer.
    pub fn run_plan(&self) -> Result<()> {
        let config = self.load_config()?;

        let plan = Container::builder()
            .register_all(application_sources(&config))
            .with_priorities(&config.container.priorities)
            .plan()?;

        tracing::info!("Planned {} components", plan.len());

        for (step, component) in plan.iter().enumerate() {
            println!(
                "{:>3}. {} [{} p{} / p{}] -> {}",
                step + 1,
                component.name,
                component.source,
                component.source_priority,
                component.priority,
                component.declared_type
            );
            for param in &component.parameters {
                println!("       needs {}", param);
            }
        }

        Ok(())
    }
}
