//! Hire and termination actions.

use chrono::NaiveDate;
use serde::Serialize;

use crate::registry::{EmployeeId, ForeignKey, ForeignKeys};

/// Personnel action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    /// New hire.
    Hire,
    /// Termination.
    Terminate,
}

/// One personnel action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeAction {
    /// Running id.
    pub action_id: u64,
    /// Employee.
    pub employee_id: EmployeeId,
    /// Action type.
    pub action_type: ActionType,
    /// Effective date.
    pub action_date: NaiveDate,
    /// Reason text.
    pub action_reason: &'static str,
    /// Organizational unit before the action.
    pub org_unit_old: Option<String>,
    /// Organizational unit after the action.
    pub org_unit_new: Option<String>,
    /// Position before the action.
    pub position_old: Option<&'static str>,
    /// Position after the action.
    pub position_new: Option<&'static str>,
}

impl ForeignKeys for EmployeeAction {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![ForeignKey::of(&self.employee_id)]
    }
}
