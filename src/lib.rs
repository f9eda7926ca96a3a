pub mod error;
pub mod http_client;
pub mod normalize;
pub mod radar_chart;
pub mod season;
pub mod shot_schema;
pub mod stats_fetch;
pub mod team_colors;
pub mod team_rates;
pub mod team_table;
