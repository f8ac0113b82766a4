use serde::Serialize;

pub const APP_TITLE: &str = "SafePayAI";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScreenRoute {
    pub path: &'static str,
    pub screen: &'static str,
    pub title: &'static str,
}

pub const ROUTES: &[ScreenRoute] = &[
    ScreenRoute { path: "/", screen: "home", title: "SafePayAI - Home" },
    ScreenRoute { path: "/dashboard", screen: "dashboard", title: "SafePayAI - Dashboard" },
    ScreenRoute { path: "/send-money", screen: "home", title: "SafePayAI - Send Money" },
    ScreenRoute { path: "/transactions", screen: "transactions", title: "SafePayAI - Transactions" },
    ScreenRoute { path: "/statements", screen: "statement", title: "SafePayAI - Statements" },
    ScreenRoute { path: "/beneficiaries", screen: "beneficiaries", title: "SafePayAI - Beneficiaries" },
    ScreenRoute { path: "/settings", screen: "settings", title: "SafePayAI - Settings" },
    ScreenRoute { path: "/help-support", screen: "help_support", title: "SafePayAI - Help & Support" },
];

pub fn find(path: &str) -> Option<&'static ScreenRoute> {
    ROUTES.iter().find(|r| r.path == path)
}

/// Document title for a path; unknown paths get the bare product name.
pub fn title_for(path: &str) -> &'static str {
    find(path).map(|r| r.title).unwrap_or(APP_TITLE)
}
