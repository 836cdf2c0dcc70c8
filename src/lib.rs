pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::fixtures::FixtureRecords;
pub use adapters::http::HttpFetcher;
pub use adapters::notify::{ConfiguredNotifier, LogNotifier, SlackNotifier};
pub use adapters::store::{InMemorySnoopStore, JsonFileSnoopStore};
pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use crate::core::current::PollDateWindow;
pub use crate::core::geography::{DouglasPeucker, OrganisationGeoSerializer};
pub use crate::core::serializers::{ElectionSerializer, Serializer};
pub use crate::core::snooper::{SnoopEngine, SnoopReport};
pub use crate::core::snoopers::LibDemNewbiesSnooper;
pub use utils::error::{ElectionError, Result};
