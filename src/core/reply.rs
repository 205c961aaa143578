use serde::Serialize;

use crate::tasks::TaskKind;

pub const MAIN_MENU_BUTTON: &str = "🏠 Main menu";
pub const CATEGORIES_BUTTON: &str = "📂 Categories";
pub const NEW_SCENARIO_BUTTON: &str = "🔄 New scenario";
pub const HISTORY_BUTTON: &str = "🕓 History";
pub const SETTINGS_BUTTON: &str = "⚙️ Settings";
pub const PROMO_POST_BUTTON: &str = "📢 Promo post";
pub const YES_BUTTON: &str = "✅ Yes";
pub const NO_BUTTON: &str = "❌ No";
pub const COMPARISON_BUTTON: &str = "📊 Comparison";
pub const FORECAST_BUTTON: &str = "🔮 Forecast";

const VARIANT_BUTTONS: [&str; 3] = ["1", "2", "3"];

/// Button layout attached to a reply. Rows of button labels; front-ends
/// decide how to draw them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Menu {
    None,
    Main,
    Categories,
    Scenario,
    Marketing,
    DocumentTypes,
    /// Numbered picks for the given count of post variants
    Variants(usize),
    YesNo,
    FinanceFollowUp,
    Actions,
}

impl Menu {
    pub fn rows(&self) -> Vec<Vec<&'static str>> {
        match self {
            Menu::None => Vec::new(),
            Menu::Main => vec![
                vec![HISTORY_BUTTON, SETTINGS_BUTTON],
                vec![CATEGORIES_BUTTON],
            ],
            Menu::Categories => {
                let mut rows: Vec<Vec<&'static str>> = TaskKind::ALL
                    .chunks(2)
                    .map(|pair| pair.iter().map(|kind| kind.label()).collect())
                    .collect();
                rows.push(vec![MAIN_MENU_BUTTON]);
                rows
            }
            Menu::Scenario => vec![
                vec![MAIN_MENU_BUTTON],
                vec![CATEGORIES_BUTTON],
                vec![NEW_SCENARIO_BUTTON],
            ],
            Menu::Marketing => vec![
                vec![PROMO_POST_BUTTON],
                vec![CATEGORIES_BUTTON],
                vec![MAIN_MENU_BUTTON],
            ],
            Menu::DocumentTypes => vec![
                vec!["📄 Contract", "📝 Letter"],
                vec!["💼 Commercial proposal"],
                vec![CATEGORIES_BUTTON],
                vec![MAIN_MENU_BUTTON],
            ],
            Menu::Variants(count) => vec![
                VARIANT_BUTTONS.iter().take(*count).copied().collect(),
                vec![MAIN_MENU_BUTTON],
            ],
            Menu::YesNo => vec![vec![YES_BUTTON, NO_BUTTON], vec![MAIN_MENU_BUTTON]],
            Menu::FinanceFollowUp => vec![
                vec![COMPARISON_BUTTON, FORECAST_BUTTON],
                vec![NO_BUTTON],
                vec![MAIN_MENU_BUTTON],
            ],
            Menu::Actions => vec![
                vec![NEW_SCENARIO_BUTTON],
                vec![HISTORY_BUTTON],
                vec![MAIN_MENU_BUTTON],
            ],
        }
    }
}

/// One message sent back to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub menu: Menu,
}

impl Reply {
    pub fn new(text: impl Into<String>, menu: Menu) -> Self {
        Reply {
            text: text.into(),
            menu,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Reply::new(text, Menu::None)
    }
}
