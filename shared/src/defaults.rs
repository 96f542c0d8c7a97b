// Baseline figures used for new listings and demo data.
use crate::models::{CapitalExpenditure, OperatingExpenditure, RevenueAssumptions};

pub const DEFAULT_NUMBER_OF_INVESTMENT_SLOTS: u32 = 10;

// Total: 1,760,160
pub const DEFAULT_CAPEX: CapitalExpenditure = CapitalExpenditure {
    setup_cost: 750_000.0,
    security_deposit: 650_000.0,
    working_capital: 180_080.0,
    emergency_fund: 180_080.0,
};

// Monthly total: 195,080
pub const DEFAULT_OPEX: OperatingExpenditure = OperatingExpenditure {
    rent: 130_000.0,
    staff: 30_000.0,
    food_staff: 6_000.0,
    utilities: 14_080.0,
    maintenance: 10_000.0,
    other_operating_costs: 5_000.0,
};

pub const DEFAULT_REVENUE_ASSUMPTIONS: RevenueAssumptions = RevenueAssumptions {
    tariff_per_room: 4_250.0,
    occupancy_rate: 0.80,
    number_of_rooms: 4,
};
