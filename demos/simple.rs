use std::{sync::Arc, time::SystemTime};

use modivo::*;

// Define regular traits and implementor structs

trait Logger: Send + Sync {
    fn log(&self, content: &str);
}

struct StdoutLogger {
    prefix: Arc<String>,
}

impl Logger for StdoutLogger {
    fn log(&self, content: &str) {
        println!("[{}] {}", self.prefix, content);
    }
}

struct DateLogger {
    logger: Arc<Box<dyn Logger>>,
}

impl Injectable for DateLogger {
    type Dependencies = (Arc<Box<dyn Logger>>,);

    fn construct((logger,): Self::Dependencies) -> Self {
        Self { logger }
    }

    fn lifecycle() -> Lifecycle<Self> {
        Lifecycle::new().on_resolved_sync()
    }
}

impl OnResolvedSync for DateLogger {
    fn after_resolved_sync(&self) {
        self.logger.log("date logger ready");
    }
}

impl DateLogger {
    fn log_date(&self) {
        let seconds = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.logger.log(&format!("{}s since epoch", seconds));
    }
}

fn main() -> Result<(), ContainerError> {
    let prefix = Ticket::<String>::new("prefix");
    let logger = Ticket::<Box<dyn Logger>>::new(Token::of::<dyn Logger>());
    let date_logger = Ticket::<DateLogger>::new(Token::of::<DateLogger>());

    let root = Container::builder()
        .with_options(ContainerOptions::default().with_label("root"))
        .register(ProviderDefinition::value(prefix.token(), String::from("root")))?
        .register(
            ProviderDefinition::factory(logger.token(), |prefix: Arc<String>| -> Box<dyn Logger> {
                Box::new(StdoutLogger { prefix })
            })
            .with_dependencies([prefix.token()]),
        )?
        .register(ProviderDefinition::class::<DateLogger>(date_logger.token()).with_dependencies([logger.token()]))?
        .build();

    // The request container only overrides the prefix, the logger still comes from the root
    let request = Container::builder()
        .with_options(ContainerOptions::default().with_label("request"))
        .with_parent(&root)
        .register(ProviderDefinition::value(prefix.token(), String::from("request")))?
        .build();

    date_logger.resolve(&request)?.log_date();
    println!("request prefix: {}", prefix.resolve(&request)?);

    root.resolve_everything()?;
    Ok(())
}
