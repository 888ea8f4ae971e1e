use web_sys::window;

/// Get the base HTTP URL (e.g., "http://localhost:3000" or "https://myapp.com")
pub fn get_base_url() -> String {
    let Some(window) = window() else {
        return String::new();
    };
    let location = window.location();

    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let host = location
        .host()
        .unwrap_or_else(|_| "localhost:3000".to_string());

    format!("{}//{}", protocol, host)
}

/// Build a full API URL from a path (e.g., "/iot/live" -> "http://localhost:3000/iot/live")
pub fn api_url(path: &str) -> String {
    format!("{}{}", get_base_url(), path)
}

/// Page load time in milliseconds, used to seed label cache-bust tokens
pub fn session_seed() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

/// CSS modifier for a status badge
pub fn status_class(status: shared::ToteStatus) -> &'static str {
    match status {
        shared::ToteStatus::Normal => "status-normal",
        shared::ToteStatus::Warning => "status-warning",
        shared::ToteStatus::Critical => "status-critical",
    }
}
