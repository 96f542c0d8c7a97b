// In-memory repository of properties and investors.
// The service owns one behind `Arc<RwLock<_>>`; tests build their own.
use chrono::Utc;
use shared::defaults::{DEFAULT_CAPEX, DEFAULT_NUMBER_OF_INVESTMENT_SLOTS, DEFAULT_OPEX, DEFAULT_REVENUE_ASSUMPTIONS};
use shared::models::{
    CalculatedMetrics, Investor, InvestorInvestment, LedgerUpdateLogEntry, MonthlyLedgerEntry, PolicyRates, Property,
    PropertyStatus,
};
use shared::utils::indian_format::format_currency;
use shared::utils::round2;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::EngineError;
use crate::projection::{self, validation};

pub struct PropertyStore {
    properties: HashMap<String, Property>,
    investors: HashMap<String, Investor>,
}

impl PropertyStore {
    pub fn new() -> Self {
        PropertyStore {
            properties: HashMap::new(),
            investors: HashMap::new(),
        }
    }

    /// A store holding one live listing built from the default figures.
    pub fn with_demo_data() -> Self {
        let mut store = Self::new();
        let mut property = Property::new(
            "prop-001",
            "Serene Stays Koramangala",
            "Bengaluru",
            DEFAULT_CAPEX,
            DEFAULT_OPEX,
            DEFAULT_REVENUE_ASSUMPTIONS,
            DEFAULT_NUMBER_OF_INVESTMENT_SLOTS,
        );
        property.status = PropertyStatus::Live;
        store.properties.insert(property.id.clone(), property);
        store
    }

    /// Adds a listing after validating its figures. The investment goal is always
    /// recomputed from the CapEx breakdown.
    pub fn add_property(&mut self, mut property: Property) -> Result<&Property, EngineError> {
        if property.id.trim().is_empty() {
            return Err(EngineError::invalid_input("id", "must not be empty"));
        }
        if self.properties.contains_key(&property.id) {
            return Err(EngineError::DuplicateRecord(format!("property '{}' already exists", property.id)));
        }
        validation::validate_capex(&property.capex_details)?;
        validation::validate_opex(&property.opex_details)?;
        validation::validate_revenue(&property.revenue_assumptions)?;
        if property.number_of_investment_slots == 0 {
            return Err(EngineError::invalid_input("numberOfInvestmentSlots", "must be at least 1"));
        }

        property.investment_goal = round2(property.capex_details.total());
        property.monthly_ledger_data.sort_by_key(|entry| entry.month);
        tracing::info!(
            property_id = %property.id,
            investment_goal = %format_currency(property.investment_goal, 0),
            "Property added to store"
        );

        let id = property.id.clone();
        Ok(self.properties.entry(id).or_insert(property))
    }

    pub fn get_property(&self, property_id: &str) -> Result<&Property, EngineError> {
        self.properties
            .get(property_id)
            .ok_or_else(|| EngineError::PropertyNotFound(property_id.to_string()))
    }

    fn get_property_mut(&mut self, property_id: &str) -> Result<&mut Property, EngineError> {
        self.properties
            .get_mut(property_id)
            .ok_or_else(|| EngineError::PropertyNotFound(property_id.to_string()))
    }

    /// All listings, ordered by id.
    pub fn list_properties(&self) -> Vec<Property> {
        let mut properties: Vec<Property> = self.properties.values().cloned().collect();
        properties.sort_by(|a, b| a.id.cmp(&b.id));
        properties
    }

    pub fn set_status(&mut self, property_id: &str, status: PropertyStatus) -> Result<&Property, EngineError> {
        let property = self.get_property_mut(property_id)?;
        tracing::info!(property_id = %property_id, from = %property.status, to = %status, "Property status changed");
        property.status = status;
        Ok(property)
    }

    /// Projected metrics for a stored listing, computed fresh on every call.
    pub fn metrics_for(&self, property_id: &str, rates: &PolicyRates) -> Result<CalculatedMetrics, EngineError> {
        let property = self.get_property(property_id)?;
        projection::compute_metrics(
            &property.capex_details,
            &property.opex_details,
            &property.revenue_assumptions,
            rates,
        )
    }

    /// Inserts or replaces the ledger entry for `entry.month` and records who changed it.
    pub fn upsert_ledger_entry(
        &mut self,
        property_id: &str,
        entry: MonthlyLedgerEntry,
        updated_by: &str,
        notes: &str,
    ) -> Result<LedgerUpdateLogEntry, EngineError> {
        if notes.trim().is_empty() {
            return Err(EngineError::invalid_input("notes", "describe the update (e.g. 'Monthly data entry')"));
        }
        let property = self.get_property_mut(property_id)?;
        let month = entry.month;

        match property.monthly_ledger_data.iter_mut().find(|existing| existing.month == month) {
            Some(existing) => {
                tracing::info!(property_id = %property_id, month = %month, "Replacing existing ledger entry");
                *existing = entry;
            }
            None => {
                property.monthly_ledger_data.push(entry);
                property.monthly_ledger_data.sort_by_key(|e| e.month);
            }
        }

        let now = Utc::now();
        property.last_ledger_update = Some(now);
        let log_entry = LedgerUpdateLogEntry {
            log_id: Uuid::new_v4().to_string(),
            updated_at: now,
            updated_by: updated_by.to_string(),
            month_updated: month,
            notes: notes.trim().to_string(),
        };
        property.ledger_update_log.push(log_entry.clone());
        tracing::debug!(property_id = %property_id, month = %month, updated_by = %updated_by, "Ledger entry recorded");

        Ok(log_entry)
    }

    pub fn add_investor(&mut self, investor: Investor) -> Result<&Investor, EngineError> {
        if investor.id.trim().is_empty() {
            return Err(EngineError::invalid_input("investorId", "must not be empty"));
        }
        if self.investors.contains_key(&investor.id) {
            return Err(EngineError::DuplicateRecord(format!("investor '{}' already exists", investor.id)));
        }
        let id = investor.id.clone();
        Ok(self.investors.entry(id).or_insert(investor))
    }

    pub fn get_investor(&self, investor_id: &str) -> Result<&Investor, EngineError> {
        self.investors
            .get(investor_id)
            .ok_or_else(|| EngineError::InvestorNotFound(investor_id.to_string()))
    }

    /// Checks that `property_id` can take `amount` without changing anything.
    ///
    /// Only live listings accept money, and never more than the goal or the value of
    /// all slots, whichever is larger. Returns the amount raised after the investment
    /// and the level at which the listing counts as fully funded.
    pub fn check_investment(&self, property_id: &str, amount: f64) -> Result<(f64, f64), EngineError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(EngineError::invalid_input("amount", format!("must be a positive amount, got {}", amount)));
        }
        let property = self.get_property(property_id)?;
        if property.status != PropertyStatus::Live {
            return Err(EngineError::invalid_input(
                "propertyId",
                format!("property '{}' is {} and not open for investment", property_id, property.status),
            ));
        }
        let slot_total = projection::slot_funding_total(property.investment_goal, property.number_of_investment_slots)?;
        let funding_cap = property.investment_goal.max(slot_total);
        let raised = round2(property.amount_raised + amount);
        if raised > funding_cap {
            return Err(EngineError::invalid_input(
                "amount",
                format!(
                    "would raise {} for property '{}', above its funding cap of {}",
                    format_currency(raised, 2),
                    property_id,
                    format_currency(funding_cap, 2)
                ),
            ));
        }
        Ok((raised, property.investment_goal.min(slot_total)))
    }

    /// Commits `amount` from an investor into a property. Once the raised amount
    /// reaches the goal, or every slot is sold, the listing moves to `FullyFunded`.
    pub fn record_investment(&mut self, investor_id: &str, property_id: &str, amount: f64) -> Result<(), EngineError> {
        let (raised, fully_funded_at) = self.check_investment(property_id, amount)?;
        if !self.investors.contains_key(investor_id) {
            return Err(EngineError::InvestorNotFound(investor_id.to_string()));
        }

        let property = self.get_property_mut(property_id)?;
        property.amount_raised = raised;
        if raised >= fully_funded_at {
            property.status = PropertyStatus::FullyFunded;
            tracing::info!(
                property_id = %property_id,
                amount_raised = %format_currency(raised, 2),
                "Property fully funded"
            );
        }

        let investor = self
            .investors
            .get_mut(investor_id)
            .ok_or_else(|| EngineError::InvestorNotFound(investor_id.to_string()))?;
        investor.total_invested = round2(investor.total_invested + amount);
        match investor.properties_invested.iter_mut().find(|i| i.property_id == property_id) {
            Some(existing) => existing.amount = round2(existing.amount + amount),
            None => investor.properties_invested.push(InvestorInvestment {
                property_id: property_id.to_string(),
                amount,
                date_invested: Some(Utc::now()),
            }),
        }
        tracing::info!(
            investor_id = %investor_id,
            property_id = %property_id,
            amount = %format_currency(amount, 2),
            "Investment recorded"
        );
        Ok(())
    }
}

impl Default for PropertyStore {
    fn default() -> Self {
        Self::new()
    }
}
