//! Inspect command handler.

use color_eyre::Result;

use crate::component::Instance;
use crate::container::Container;
use crate::web::application_sources;

use super::App;

impl App {
    /// Build the container and print its components.
    pub fn run_inspect(&self, key: Option<&str>) -> Result<()> {
        let config = self.load_config()?;

        let container = Container::builder()
            .register_all(application_sources(&config))
            .with_priorities(&config.container.priorities)
            .build()?;

        match key {
            Some(key) => print_instance(container.resolve(key)?),
            None => container.instances().iter().for_each(print_instance),
        }

        Ok(())
    }
}

fn print_instance(instance: &Instance) {
    println!(
        "#{} {} (from {})",
        instance.id().index(),
        instance.name(),
        instance.source_name()
    );
    println!("    declared: {}", instance.declared_type());
    if instance.concrete_type() != instance.declared_type() {
        println!("    concrete: {}", instance.concrete_type());
    }
}
