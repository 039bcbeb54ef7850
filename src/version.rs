// Version and build information

/// Build information structure
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: String,
    pub build_date: String,
    pub build_hash: String,
    pub target_triple: String,
    pub optimized: bool,
}

/// Get current build information
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown").to_string(),
        build_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        target_triple: option_env!("BUILD_TARGET").unwrap_or("unknown").to_string(),
        optimized: cfg!(not(debug_assertions)),
    }
}

impl BuildInfo {
    pub fn format_display(&self) -> String {
        format!("wgsentry v{}", self.version)
    }

    pub fn format_build_info(&self) -> String {
        format!(
            "Build: {}\nTarget: {}\nProfile: {}\nGit: {}",
            self.build_date,
            self.target_triple,
            if self.optimized { "release" } else { "debug" },
            self.build_hash
        )
    }
}
