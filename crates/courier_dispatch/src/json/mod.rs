pub mod fleet_plan;
