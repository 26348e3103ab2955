pub struct DefaultsConfig {
    pub root_name: String,
    pub force_group: i64,
    pub uses_periodic: bool,
    pub outputs_forces: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            root_name: "Force".to_string(),
            force_group: 0,
            uses_periodic: false,
            outputs_forces: false,
        }
    }
}
