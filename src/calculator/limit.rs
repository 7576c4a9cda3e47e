//! Credit limit sizing output

use serde::{Deserialize, Serialize};

use crate::product::CreditScoreGrade;

/// Which cap decided the installment a limit was sized from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingConstraint {
    /// One third of average monthly inflow
    Affordability,
    /// The grade's ceiling converted to an installment
    GradeCeiling,
}

/// Every intermediate value of a limit sizing, in calculation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitBreakdown {
    pub grade: CreditScoreGrade,
    pub sum_inflow_6m: f64,
    pub periods: u32,

    /// Affordable installment: average monthly inflow / 3, rounded
    pub monthly_capacity: f64,

    /// Largest installment the grade allows (unrounded)
    pub max_installment: f64,

    /// Lower of the two caps, rounded
    pub final_installment: f64,

    /// Present value of `final_installment` over `periods`, rounded
    pub credit_limit: f64,

    pub binding: BindingConstraint,
}
