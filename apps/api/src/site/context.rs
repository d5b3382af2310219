//! Values every page layout needs: the profile, the services menu and the viewer's preferences.

use tracing::warn;

use crate::auth::Viewer;
use crate::errors::AppError;
use crate::models::{Profile, Service, ServiceCategory, User, UserPreference};
use crate::state::AppState;
use crate::store::ListFilter;

/// Services per category shown in the navigation menu.
pub const MENU_SERVICES_PER_CATEGORY: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct ServicesMenu {
    pub management: Vec<Service>,
    pub normal: Vec<Service>,
}

#[derive(Debug, Clone, Default)]
pub struct SiteContext {
    pub profile: Option<Profile>,
    pub services_menu: ServicesMenu,
    pub user: Option<User>,
    /// Present only for authenticated users.
    pub prefs: Option<UserPreference>,
}

impl SiteContext {
    /// The menu and preferences degrade to empty on store errors; the profile does not.
    pub async fn load(state: &AppState, viewer: &Viewer) -> Result<Self, AppError> {
        let profile = state.portfolio.first_profile().await?;

        let services_menu = match load_services_menu(state).await {
            Ok(menu) => menu,
            Err(e) => {
                warn!("Services menu unavailable: {e}");
                ServicesMenu::default()
            }
        };

        let prefs = match &viewer.user {
            Some(user) => match state.accounts.preferences(user.id).await {
                Ok(prefs) => Some(prefs),
                Err(e) => {
                    warn!("Preferences for user {} unavailable: {e}", user.id);
                    None
                }
            },
            None => None,
        };

        Ok(SiteContext {
            profile,
            services_menu,
            user: viewer.user.clone(),
            prefs,
        })
    }

    pub fn show_email(&self) -> bool {
        self.prefs.as_ref().map_or(true, |prefs| prefs.show_email)
    }

    pub fn show_phone(&self) -> bool {
        self.prefs.as_ref().map_or(true, |prefs| prefs.show_phone)
    }
}

async fn load_services_menu(state: &AppState) -> Result<ServicesMenu, AppError> {
    let mut menu = ServicesMenu::default();
    for category in [ServiceCategory::Management, ServiceCategory::Normal] {
        let filter = ListFilter {
            category: Some(category.code().to_string()),
            ..ListFilter::default()
        };
        let mut services = state.portfolio.list_services(&filter).await?;
        services.truncate(MENU_SERVICES_PER_CATEGORY);
        match category {
            ServiceCategory::Management => menu.management = services,
            ServiceCategory::Normal => menu.normal = services,
        }
    }
    Ok(menu)
}
