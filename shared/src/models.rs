use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::round2;

/// One-time upfront costs needed to put a property into operation.
/// The sum is the property's investment goal and the ROI denominator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalExpenditure {
    pub setup_cost: f64,
    pub security_deposit: f64,
    pub working_capital: f64,
    pub emergency_fund: f64,
}

impl CapitalExpenditure {
    pub fn total(&self) -> f64 {
        self.setup_cost + self.security_deposit + self.working_capital + self.emergency_fund
    }
}

/// Recurring monthly running costs of a property.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingExpenditure {
    pub rent: f64,
    pub staff: f64,
    pub food_staff: f64,
    pub utilities: f64,
    pub maintenance: f64,
    #[serde(default)]
    pub other_operating_costs: f64,
}

impl OperatingExpenditure {
    /// Monthly total, summed in declaration order.
    pub fn total(&self) -> f64 {
        self.rent
            + self.staff
            + self.food_staff
            + self.utilities
            + self.maintenance
            + self.other_operating_costs
    }

    /// Field-wise sum, used when aggregating ledger actuals over a period.
    pub fn accumulate(&mut self, other: &OperatingExpenditure) {
        self.rent += other.rent;
        self.staff += other.staff;
        self.food_staff += other.food_staff;
        self.utilities += other.utilities;
        self.maintenance += other.maintenance;
        self.other_operating_costs += other.other_operating_costs;
    }
}

/// Revenue assumptions for a property. Every room is rentable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueAssumptions {
    pub tariff_per_room: f64,
    /// Fraction of room-nights booked. Clamped to [0, 1] by the engine.
    pub occupancy_rate: f64,
    pub number_of_rooms: u32,
}

/// Policy constants fed into the projection engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRates {
    pub gst_rate: f64,
    pub commission_rate: f64,
    pub investor_share_rate: f64,
    pub projection_years: u32,
}

impl Default for PolicyRates {
    fn default() -> Self {
        PolicyRates {
            gst_rate: 0.18,
            commission_rate: 0.12,
            investor_share_rate: 0.50,
            projection_years: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiProjectionItem {
    pub year: u32,
    pub annual_return_percentage: f64,
    pub cumulative_return_percentage: f64,
    pub annual_investor_share_amount: f64,
}

/// Output of one projection run. Built fresh per call and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedMetrics {
    pub total_capex: f64,
    pub total_opex_monthly: f64,
    pub annual_opex: f64,
    pub monthly_gross_revenue: f64,
    pub monthly_gst_amount: f64,
    pub monthly_commission_amount: f64,
    pub monthly_net_revenue: f64,
    pub annual_net_revenue: f64,
    pub annual_net_profit: f64,
    pub annual_investor_share: f64,
    pub monthly_investor_share: f64,
    pub roi_projections: Vec<RoiProjectionItem>,
    pub rentable_rooms: u32,
}

/// Calendar month of a ledger entry, written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LedgerMonth(NaiveDate);

impl LedgerMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(LedgerMonth)
    }

    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
            .map(LedgerMonth)
            .map_err(|e| anyhow!("Failed to parse month '{}': {}", s, e))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The month `n` months before this one.
    pub fn months_back(&self, n: u32) -> Option<Self> {
        self.0.checked_sub_months(Months::new(n)).map(LedgerMonth)
    }
}

impl fmt::Display for LedgerMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0.year(), self.0.month())
    }
}

impl FromStr for LedgerMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        LedgerMonth::parse(s)
    }
}

impl TryFrom<String> for LedgerMonth {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        LedgerMonth::parse(&value)
    }
}

impl From<LedgerMonth> for String {
    fn from(month: LedgerMonth) -> Self {
        month.to_string()
    }
}

/// Actual performance of a property for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyLedgerEntry {
    pub month: LedgerMonth,
    /// Actual gross revenue for the month.
    pub revenue: f64,
    pub occupancy_rate_actual: f64,
    pub opex_actual: OperatingExpenditure,
    pub total_operating_expenses_actual: f64,
    pub net_profit_actual: f64,
    pub total_payout_to_investors: f64,
}

impl MonthlyLedgerEntry {
    /// Builds an entry from recorded actuals, deriving the expense total and net profit.
    pub fn from_actuals(
        month: LedgerMonth,
        revenue: f64,
        occupancy_rate_actual: f64,
        opex_actual: OperatingExpenditure,
        total_payout_to_investors: f64,
    ) -> Self {
        let total_operating_expenses_actual = opex_actual.total();
        MonthlyLedgerEntry {
            month,
            revenue,
            occupancy_rate_actual,
            opex_actual,
            total_operating_expenses_actual,
            net_profit_actual: revenue - total_operating_expenses_actual,
            total_payout_to_investors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerUpdateLogEntry {
    pub log_id: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
    pub month_updated: LedgerMonth,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyStatus {
    Draft,
    Live,
    #[serde(rename = "Fully Funded")]
    FullyFunded,
    Closed,
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PropertyStatus::Draft => "Draft",
            PropertyStatus::Live => "Live",
            PropertyStatus::FullyFunded => "Fully Funded",
            PropertyStatus::Closed => "Closed",
        };
        f.write_str(label)
    }
}

impl FromStr for PropertyStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(&['_', '-'][..], " ").as_str() {
            "draft" => Ok(PropertyStatus::Draft),
            "live" => Ok(PropertyStatus::Live),
            "fully funded" | "fullyfunded" => Ok(PropertyStatus::FullyFunded),
            "closed" => Ok(PropertyStatus::Closed),
            _ => Err(anyhow!("Unknown property status '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub name: String,
    pub city: String,
    pub status: PropertyStatus,
    pub number_of_investment_slots: u32,
    pub capex_details: CapitalExpenditure,
    pub opex_details: OperatingExpenditure,
    pub revenue_assumptions: RevenueAssumptions,
    /// Equal to the CapEx total.
    pub investment_goal: f64,
    pub amount_raised: f64,
    #[serde(default)]
    pub monthly_ledger_data: Vec<MonthlyLedgerEntry>,
    #[serde(default)]
    pub ledger_update_log: Vec<LedgerUpdateLogEntry>,
    #[serde(default)]
    pub last_ledger_update: Option<DateTime<Utc>>,
}

impl Property {
    /// A fresh draft listing with nothing raised and an empty ledger.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        capex_details: CapitalExpenditure,
        opex_details: OperatingExpenditure,
        revenue_assumptions: RevenueAssumptions,
        number_of_investment_slots: u32,
    ) -> Self {
        Property {
            id: id.into(),
            name: name.into(),
            city: city.into(),
            status: PropertyStatus::Draft,
            number_of_investment_slots,
            investment_goal: round2(capex_details.total()),
            capex_details,
            opex_details,
            revenue_assumptions,
            amount_raised: 0.0,
            monthly_ledger_data: Vec::new(),
            ledger_update_log: Vec::new(),
            last_ledger_update: None,
        }
    }

    pub fn ledger_entry(&self, month: LedgerMonth) -> Option<&MonthlyLedgerEntry> {
        self.monthly_ledger_data.iter().find(|entry| entry.month == month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorInvestment {
    pub property_id: String,
    pub amount: f64,
    #[serde(default)]
    pub date_invested: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub total_invested: f64,
    #[serde(default)]
    pub properties_invested: Vec<InvestorInvestment>,
}

impl Investor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Investor {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            total_invested: 0.0,
            properties_invested: Vec::new(),
        }
    }
}
