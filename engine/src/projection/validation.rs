// Input boundary for the projection engine.
//
// Form fields and JSON payloads arrive loosely shaped: numbers may be missing, sent as
// strings ("4,250"), or be nonsense. Everything is converted here into the typed records
// from `shared::models` and rejected with `EngineError::InvalidInput` when it does not fit.
use serde::Deserialize;
use shared::models::{CalculatedMetrics, CapitalExpenditure, OperatingExpenditure, PolicyRates, RevenueAssumptions};
use shared::utils::indian_format;

use super::MAX_PROJECTION_YEARS;
use crate::error::EngineError;

fn ensure_finite(field: &str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::invalid_input(field, format!("must be a finite number, got {}", value)))
    }
}

fn ensure_amount(field: &str, value: f64) -> Result<(), EngineError> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(EngineError::invalid_input(field, format!("must not be negative, got {}", value)));
    }
    Ok(())
}

fn ensure_rate(field: &str, value: f64) -> Result<(), EngineError> {
    ensure_amount(field, value)?;
    if value > 1.0 {
        return Err(EngineError::invalid_input(field, format!("must be a fraction between 0 and 1, got {}", value)));
    }
    Ok(())
}

pub fn validate_capex(capex: &CapitalExpenditure) -> Result<(), EngineError> {
    ensure_amount("setupCost", capex.setup_cost)?;
    ensure_amount("securityDeposit", capex.security_deposit)?;
    ensure_amount("workingCapital", capex.working_capital)?;
    ensure_amount("emergencyFund", capex.emergency_fund)
}

pub fn validate_opex(opex: &OperatingExpenditure) -> Result<(), EngineError> {
    ensure_amount("rent", opex.rent)?;
    ensure_amount("staff", opex.staff)?;
    ensure_amount("foodStaff", opex.food_staff)?;
    ensure_amount("utilities", opex.utilities)?;
    ensure_amount("maintenance", opex.maintenance)?;
    ensure_amount("otherOperatingCosts", opex.other_operating_costs)
}

/// Occupancy only has to be finite; out-of-range values are clamped by the engine.
pub fn validate_revenue(revenue: &RevenueAssumptions) -> Result<(), EngineError> {
    ensure_amount("tariffPerRoom", revenue.tariff_per_room)?;
    ensure_finite("occupancyRate", revenue.occupancy_rate)
}

pub fn validate_rates(rates: &PolicyRates) -> Result<(), EngineError> {
    ensure_rate("gstRate", rates.gst_rate)?;
    ensure_rate("commissionRate", rates.commission_rate)?;
    ensure_rate("investorShareRate", rates.investor_share_rate)?;
    if rates.projection_years > MAX_PROJECTION_YEARS {
        return Err(EngineError::invalid_input(
            "projectionYears",
            format!("must be at most {}, got {}", MAX_PROJECTION_YEARS, rates.projection_years),
        ));
    }
    Ok(())
}

/// A number as it arrives from a form: a JSON number or its text rendering.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn resolve(&self, field: &str) -> Result<Option<f64>, EngineError> {
        match self {
            RawNumber::Number(value) => Ok(Some(*value)),
            RawNumber::Text(text) if text.trim().is_empty() => Ok(None),
            RawNumber::Text(text) => indian_format::parse_amount(text)
                .map(Some)
                .map_err(|e| EngineError::invalid_input(field, e.to_string())),
        }
    }
}

fn required(field: &str, raw: &Option<RawNumber>) -> Result<f64, EngineError> {
    match raw {
        Some(number) => number.resolve(field)?.ok_or_else(|| EngineError::invalid_input(field, "missing")),
        None => Err(EngineError::invalid_input(field, "missing")),
    }
}

fn optional(field: &str, raw: &Option<RawNumber>) -> Result<Option<f64>, EngineError> {
    match raw {
        Some(number) => number.resolve(field),
        None => Ok(None),
    }
}

fn whole_number(field: &str, value: f64) -> Result<u32, EngineError> {
    ensure_amount(field, value)?;
    if value.fract() != 0.0 {
        return Err(EngineError::invalid_input(field, format!("must be a whole number, got {}", value)));
    }
    if value > f64::from(u32::MAX) {
        return Err(EngineError::invalid_input(field, format!("is too large, got {}", value)));
    }
    Ok(value as u32)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCapex {
    pub setup_cost: Option<RawNumber>,
    pub security_deposit: Option<RawNumber>,
    pub working_capital: Option<RawNumber>,
    pub emergency_fund: Option<RawNumber>,
}

impl TryFrom<RawCapex> for CapitalExpenditure {
    type Error = EngineError;

    fn try_from(raw: RawCapex) -> Result<Self, Self::Error> {
        let capex = CapitalExpenditure {
            setup_cost: required("setupCost", &raw.setup_cost)?,
            security_deposit: required("securityDeposit", &raw.security_deposit)?,
            working_capital: required("workingCapital", &raw.working_capital)?,
            emergency_fund: required("emergencyFund", &raw.emergency_fund)?,
        };
        validate_capex(&capex)?;
        Ok(capex)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOpex {
    pub rent: Option<RawNumber>,
    pub staff: Option<RawNumber>,
    pub food_staff: Option<RawNumber>,
    pub utilities: Option<RawNumber>,
    pub maintenance: Option<RawNumber>,
    pub other_operating_costs: Option<RawNumber>,
}

impl TryFrom<RawOpex> for OperatingExpenditure {
    type Error = EngineError;

    fn try_from(raw: RawOpex) -> Result<Self, Self::Error> {
        let opex = OperatingExpenditure {
            rent: required("rent", &raw.rent)?,
            staff: required("staff", &raw.staff)?,
            food_staff: required("foodStaff", &raw.food_staff)?,
            utilities: required("utilities", &raw.utilities)?,
            maintenance: required("maintenance", &raw.maintenance)?,
            // Listed as optional on property records; absent means no miscellaneous costs.
            other_operating_costs: optional("otherOperatingCosts", &raw.other_operating_costs)?.unwrap_or(0.0),
        };
        validate_opex(&opex)?;
        Ok(opex)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRevenue {
    pub tariff_per_room: Option<RawNumber>,
    pub occupancy_rate: Option<RawNumber>,
    pub number_of_rooms: Option<RawNumber>,
}

impl TryFrom<RawRevenue> for RevenueAssumptions {
    type Error = EngineError;

    fn try_from(raw: RawRevenue) -> Result<Self, Self::Error> {
        let revenue = RevenueAssumptions {
            tariff_per_room: required("tariffPerRoom", &raw.tariff_per_room)?,
            occupancy_rate: required("occupancyRate", &raw.occupancy_rate)?,
            number_of_rooms: whole_number("numberOfRooms", required("numberOfRooms", &raw.number_of_rooms)?)?,
        };
        validate_revenue(&revenue)?;
        Ok(revenue)
    }
}

/// Rate overrides. Fields left out keep the configured policy value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRates {
    pub gst_rate: Option<RawNumber>,
    pub commission_rate: Option<RawNumber>,
    pub investor_share_rate: Option<RawNumber>,
    pub projection_years: Option<RawNumber>,
}

impl RawRates {
    pub fn resolve(&self, defaults: &PolicyRates) -> Result<PolicyRates, EngineError> {
        let projection_years = match optional("projectionYears", &self.projection_years)? {
            Some(years) => whole_number("projectionYears", years)?,
            None => defaults.projection_years,
        };
        let rates = PolicyRates {
            gst_rate: optional("gstRate", &self.gst_rate)?.unwrap_or(defaults.gst_rate),
            commission_rate: optional("commissionRate", &self.commission_rate)?.unwrap_or(defaults.commission_rate),
            investor_share_rate: optional("investorShareRate", &self.investor_share_rate)?
                .unwrap_or(defaults.investor_share_rate),
            projection_years,
        };
        validate_rates(&rates)?;
        Ok(rates)
    }
}

/// Body of a metrics request: `{capex, opex, revenue, constants?}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetricsRequest {
    pub capex: Option<RawCapex>,
    pub opex: Option<RawOpex>,
    pub revenue: Option<RawRevenue>,
    pub constants: Option<RawRates>,
}

/// Fully validated engine inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsInputs {
    pub capex: CapitalExpenditure,
    pub opex: OperatingExpenditure,
    pub revenue: RevenueAssumptions,
    pub rates: PolicyRates,
}

impl MetricsInputs {
    pub fn compute(&self) -> Result<CalculatedMetrics, EngineError> {
        super::compute_metrics(&self.capex, &self.opex, &self.revenue, &self.rates)
    }
}

impl RawMetricsRequest {
    pub fn into_inputs(self, default_rates: &PolicyRates) -> Result<MetricsInputs, EngineError> {
        let capex = self.capex.ok_or_else(|| EngineError::invalid_input("capex", "missing"))?;
        let opex = self.opex.ok_or_else(|| EngineError::invalid_input("opex", "missing"))?;
        let revenue = self.revenue.ok_or_else(|| EngineError::invalid_input("revenue", "missing"))?;
        let rates = match self.constants {
            Some(raw) => raw.resolve(default_rates)?,
            None => {
                validate_rates(default_rates)?;
                *default_rates
            }
        };
        Ok(MetricsInputs {
            capex: capex.try_into()?,
            opex: opex.try_into()?,
            revenue: revenue.try_into()?,
            rates,
        })
    }
}

/// Parses a JSON metrics request into validated inputs.
pub fn parse_metrics_request(value: serde_json::Value, default_rates: &PolicyRates) -> Result<MetricsInputs, EngineError> {
    let raw: RawMetricsRequest =
        serde_json::from_value(value).map_err(|e| EngineError::invalid_input("request", e.to_string()))?;
    raw.into_inputs(default_rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference_request() -> serde_json::Value {
        json!({
            "capex": {"setupCost": 750000, "securityDeposit": 650000, "workingCapital": 180080, "emergencyFund": 180080},
            "opex": {"rent": 130000, "staff": 30000, "foodStaff": 6000, "utilities": 14080, "maintenance": 10000, "otherOperatingCosts": 5000},
            "revenue": {"tariffPerRoom": 4250, "occupancyRate": 0.8, "numberOfRooms": 4}
        })
    }

    fn field_of(err: EngineError) -> String {
        match err {
            EngineError::InvalidInput { field, .. } => field,
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_reference_request_uses_default_rates() {
        let inputs = parse_metrics_request(reference_request(), &PolicyRates::default()).unwrap();
        assert_eq!(inputs.capex.total(), 1_760_160.0);
        assert_eq!(inputs.opex.total(), 195_080.0);
        assert_eq!(inputs.revenue.number_of_rooms, 4);
        assert_eq!(inputs.rates, PolicyRates::default());

        let metrics = inputs.compute().unwrap();
        assert_eq!(metrics.annual_investor_share, 543_120.0);
    }

    #[test]
    fn test_text_fields_are_coerced() {
        let mut request = reference_request();
        request["capex"]["setupCost"] = json!("7,50,000");
        request["revenue"]["tariffPerRoom"] = json!(" 4250 ");
        request["revenue"]["numberOfRooms"] = json!("4");
        let inputs = parse_metrics_request(request, &PolicyRates::default()).unwrap();
        assert_eq!(inputs.capex.setup_cost, 750_000.0);
        assert_eq!(inputs.revenue.tariff_per_room, 4250.0);
        assert_eq!(inputs.revenue.number_of_rooms, 4);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let mut request = reference_request();
        request["capex"].as_object_mut().unwrap().remove("emergencyFund");
        let err = parse_metrics_request(request, &PolicyRates::default()).unwrap_err();
        assert_eq!(field_of(err), "emergencyFund");

        let mut request = reference_request();
        request["revenue"]["occupancyRate"] = json!("");
        let err = parse_metrics_request(request, &PolicyRates::default()).unwrap_err();
        assert_eq!(field_of(err), "occupancyRate");

        let mut request = reference_request();
        request.as_object_mut().unwrap().remove("opex");
        let err = parse_metrics_request(request, &PolicyRates::default()).unwrap_err();
        assert_eq!(field_of(err), "opex");
    }

    #[test]
    fn test_other_operating_costs_is_optional() {
        let mut request = reference_request();
        request["opex"].as_object_mut().unwrap().remove("otherOperatingCosts");
        let inputs = parse_metrics_request(request, &PolicyRates::default()).unwrap();
        assert_eq!(inputs.opex.other_operating_costs, 0.0);
        assert_eq!(inputs.opex.total(), 190_080.0);
    }

    #[test]
    fn test_bad_room_counts_are_rejected() {
        for rooms in [json!(-1), json!(2.5), json!("four")] {
            let mut request = reference_request();
            request["revenue"]["numberOfRooms"] = rooms;
            let err = parse_metrics_request(request, &PolicyRates::default()).unwrap_err();
            assert_eq!(field_of(err), "numberOfRooms");
        }
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        let mut request = reference_request();
        request["opex"]["rent"] = json!(-130000);
        let err = parse_metrics_request(request, &PolicyRates::default()).unwrap_err();
        assert_eq!(field_of(err), "rent");
    }

    #[test]
    fn test_out_of_range_occupancy_is_accepted_for_clamping() {
        let mut request = reference_request();
        request["revenue"]["occupancyRate"] = json!(1.5);
        let inputs = parse_metrics_request(request, &PolicyRates::default()).unwrap();
        assert_eq!(inputs.revenue.occupancy_rate, 1.5);
        assert_eq!(inputs.compute().unwrap().monthly_gross_revenue, 510_000.0);
    }

    #[test]
    fn test_partial_constants_fall_back_to_defaults() {
        let mut request = reference_request();
        request["constants"] = json!({"gstRate": 0.05, "projectionYears": 3});
        let inputs = parse_metrics_request(request, &PolicyRates::default()).unwrap();
        assert_eq!(inputs.rates.gst_rate, 0.05);
        assert_eq!(inputs.rates.commission_rate, 0.12);
        assert_eq!(inputs.rates.investor_share_rate, 0.50);
        assert_eq!(inputs.rates.projection_years, 3);
    }

    #[test]
    fn test_invalid_constants_are_rejected() {
        let mut request = reference_request();
        request["constants"] = json!({"investorShareRate": 1.5});
        let err = parse_metrics_request(request, &PolicyRates::default()).unwrap_err();
        assert_eq!(field_of(err), "investorShareRate");

        let mut request = reference_request();
        request["constants"] = json!({"projectionYears": 500});
        let err = parse_metrics_request(request, &PolicyRates::default()).unwrap_err();
        assert_eq!(field_of(err), "projectionYears");
    }

    #[test]
    fn test_non_object_request_is_rejected() {
        let err = parse_metrics_request(json!([1, 2, 3]), &PolicyRates::default()).unwrap_err();
        assert_eq!(field_of(err), "request");
    }
}
