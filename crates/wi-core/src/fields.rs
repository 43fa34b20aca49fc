//! Well-known field reference names
//!
//! The subset of system field reference names the engine itself needs; query
//! callers are free to request any field by its reference name.

pub const ID: &str = "System.Id";
pub const TITLE: &str = "System.Title";
pub const STATE: &str = "System.State";
pub const WORK_ITEM_TYPE: &str = "System.WorkItemType";
pub const ASSIGNED_TO: &str = "System.AssignedTo";
pub const AREA_PATH: &str = "System.AreaPath";
pub const ITERATION_PATH: &str = "System.IterationPath";
pub const TAGS: &str = "System.Tags";
pub const CHANGED_DATE: &str = "System.ChangedDate";
pub const CREATED_DATE: &str = "System.CreatedDate";
pub const TEAM_PROJECT: &str = "System.TeamProject";
