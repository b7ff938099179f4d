// Radio backends. Both are always compiled; `factory::create_radio` picks one
// according to the selected feature.

pub mod mock;
pub mod wpa_cli;
