pub mod panel_env;
