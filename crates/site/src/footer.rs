//! Static footer content.

use chrono::{Datelike, Utc};

pub const COMMUNITY_URL: &str = "http://discord.gg/adeft";

/// One footer link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterLink {
    pub label: &'static str,
    pub href: &'static str,
}

impl FooterLink {
    const fn new(label: &'static str, href: &'static str) -> Self {
        Self { label, href }
    }

    /// Off-site links open in a new tab.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.href.starts_with("http://") || self.href.starts_with("https://")
    }
}

/// A titled column of links.
#[derive(Debug, Clone)]
pub struct LinkGroup {
    pub title: &'static str,
    pub links: Vec<FooterLink>,
}

/// Everything the footer renders.
#[derive(Debug, Clone)]
pub struct Footer {
    pub community_url: &'static str,
    pub groups: Vec<LinkGroup>,
    pub legal: Vec<FooterLink>,
    pub year: i32,
}

impl Footer {
    /// Footer for the current UTC year.
    #[must_use]
    pub fn current() -> Self {
        Self::for_year(Utc::now().year())
    }

    #[must_use]
    pub fn for_year(year: i32) -> Self {
        Self {
            community_url: COMMUNITY_URL,
            groups: vec![
                LinkGroup {
                    title: "Quick Links",
                    links: vec![
                        FooterLink::new("Home", "/"),
                        FooterLink::new("About", "/about"),
                        FooterLink::new("Contact", "/contact"),
                        FooterLink::new("Discord", COMMUNITY_URL),
                    ],
                },
                LinkGroup {
                    title: "Services",
                    links: vec![
                        FooterLink::new("Renting Pods", "/about"),
                        FooterLink::new("Bronze Package", "/about"),
                        FooterLink::new("Silver Package", "/about"),
                        FooterLink::new("Gold Package", "/about"),
                        FooterLink::new("Diamond Package", "/about"),
                    ],
                },
            ],
            legal: vec![
                FooterLink::new("Privacy Policy", "/privacy"),
                FooterLink::new("Terms of Service", "/terms"),
                FooterLink::new("Cookie Policy", "/cookies"),
            ],
            year,
        }
    }

    #[must_use]
    pub fn copyright(&self) -> String {
        format!("© {} Mediarch. All rights reserved.", self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copyright_uses_year() {
        assert_eq!(
            Footer::for_year(2031).copyright(),
            "© 2031 Mediarch. All rights reserved."
        );
    }

    #[test]
    fn test_groups_and_external_links() {
        let footer = Footer::for_year(2025);
        let titles: Vec<_> = footer.groups.iter().map(|g| g.title).collect();
        assert_eq!(titles, ["Quick Links", "Services"]);

        let discord = footer
            .groups
            .iter()
            .flat_map(|g| &g.links)
            .find(|l| l.label == "Discord");
        assert!(discord.is_some_and(FooterLink::is_external));
        assert!(footer.legal.iter().all(|l| !l.is_external()));
    }
}
