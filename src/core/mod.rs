pub mod current;
pub mod geography;
pub mod serializers;
pub mod snooper;
pub mod snoopers;

pub use crate::domain::model::{Election, Organisation, SnoopedElection, SnoopedEntry};
pub use crate::domain::ports::{
    ConfigProvider, CurrentElectionPolicy, GeometrySimplifier, Notifier, PageFetcher,
    RecordSource, SnoopedElectionStore, Snooper, Storage,
};
pub use crate::utils::error::Result;
