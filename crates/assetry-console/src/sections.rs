//! The console's navigable sections.

use assetry_core::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One sidebar section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    /// Headline numbers
    Dashboard,
    /// Hardware assets
    Assets,
    /// Software licenses
    Licenses,
    /// Accessories
    Accessories,
    /// Consumables
    Consumables,
    /// Components
    Components,
    /// People
    People,
    /// Requestable items
    RequestableItems,
    /// Predefined kits
    PredefinedKits,
    /// Alerts and notifications
    Alerts,
    /// Compliance checks and policy violations
    Compliance,
    /// Maintenance and repairs
    Maintenance,
    /// Estate value
    Financial,
    /// Distributions and utilisation
    Analytics,
    /// External integrations
    Integrations,
    /// Saved reports
    Reports,
    /// Import history
    Import,
    /// Operator profile and preferences
    Settings,
}

impl Section {
    /// Every section, in sidebar order.
    pub const ALL: [Section; 18] = [
        Section::Dashboard,
        Section::Assets,
        Section::Licenses,
        Section::Accessories,
        Section::Consumables,
        Section::Components,
        Section::People,
        Section::RequestableItems,
        Section::PredefinedKits,
        Section::Alerts,
        Section::Compliance,
        Section::Maintenance,
        Section::Financial,
        Section::Analytics,
        Section::Integrations,
        Section::Reports,
        Section::Import,
        Section::Settings,
    ];

    /// Section id.
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Assets => "assets",
            Section::Licenses => "licenses",
            Section::Accessories => "accessories",
            Section::Consumables => "consumables",
            Section::Components => "components",
            Section::People => "people",
            Section::RequestableItems => "requestable-items",
            Section::PredefinedKits => "predefined-kits",
            Section::Alerts => "alerts",
            Section::Compliance => "compliance",
            Section::Maintenance => "maintenance",
            Section::Financial => "financial",
            Section::Analytics => "analytics",
            Section::Integrations => "integrations",
            Section::Reports => "reports",
            Section::Import => "import",
            Section::Settings => "settings",
        }
    }

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Assets => "Assets",
            Section::Licenses => "Licenses",
            Section::Accessories => "Accessories",
            Section::Consumables => "Consumables",
            Section::Components => "Components",
            Section::People => "People",
            Section::RequestableItems => "Requestable Items",
            Section::PredefinedKits => "Predefined Kits",
            Section::Alerts => "Alerts & Notifications",
            Section::Compliance => "Compliance & Audits",
            Section::Maintenance => "Maintenance & Repairs",
            Section::Financial => "Financial Management",
            Section::Analytics => "Analytics & Insights",
            Section::Integrations => "Integrations",
            Section::Reports => "Reports",
            Section::Import => "Import",
            Section::Settings => "Settings",
        }
    }

    /// Kinds listed by this section. Aggregate and settings sections list
    /// none.
    pub fn kinds(self) -> &'static [EntityKind] {
        match self {
            Section::Assets => &[EntityKind::Asset],
            Section::Licenses => &[EntityKind::License],
            Section::Accessories => &[EntityKind::Accessory],
            Section::Consumables => &[EntityKind::Consumable],
            Section::Components => &[EntityKind::Component],
            Section::People => &[EntityKind::Person],
            Section::RequestableItems => &[EntityKind::RequestableItem],
            Section::PredefinedKits => &[EntityKind::Kit],
            Section::Alerts => &[EntityKind::Alert],
            Section::Compliance => &[EntityKind::ComplianceCheck, EntityKind::PolicyViolation],
            Section::Maintenance => &[EntityKind::MaintenanceRecord],
            Section::Integrations => &[EntityKind::Integration],
            Section::Reports => &[EntityKind::Report],
            Section::Import => &[EntityKind::ImportRecord],
            Section::Dashboard | Section::Financial | Section::Analytics | Section::Settings => &[],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = assetry_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == wanted)
            .ok_or_else(|| assetry_core::Error::validation(format!("Unknown section '{s}'")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_kind_is_listed_exactly_once() {
        let listed: Vec<EntityKind> = Section::ALL
            .iter()
            .flat_map(|s| s.kinds().iter().copied())
            .collect();
        let unique: HashSet<_> = listed.iter().collect();
        assert_eq!(listed.len(), EntityKind::ALL.len());
        assert_eq!(unique.len(), EntityKind::ALL.len());
    }

    #[test]
    fn test_parse_section_ids() {
        for section in Section::ALL {
            assert_eq!(section.as_str().parse::<Section>().unwrap(), section);
        }
        assert!("warehouse".parse::<Section>().is_err());
    }
}
