//! Production workflow: decode orders, bucket them per stage, enrich them
//! from the secondary sheets and encode stage completions for write-back.

pub mod bucket;
pub mod join;
pub mod layout;
pub mod materials;
pub mod record;
pub mod stage;
pub mod writeback;

pub use bucket::{Buckets, classify};
pub use join::{StageItem, attach_delivery_orders, enrich_with_job_cards, left_join};
pub use layout::{
    DeliveryOrderLayout, JobCardLayout, MaterialRun, ProductionLayout, SheetLayout, StageColumns,
};
pub use materials::{RawMaterial, decode_raw_materials};
pub use record::{
    DeliveryOrder, JobCard, ProductionOrder, decode_delivery_orders, decode_job_cards,
    decode_orders,
};
pub use stage::{ParseStageError, Stage, StageEntry, StageState, Stamp};
pub use writeback::{JobCardForm, StageUpdate};
