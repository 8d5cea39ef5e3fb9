use serde::{Deserialize, Serialize};

use crate::config::DiagnosticThresholds;
use crate::i18n::{keys, LocaleView};

/// 현재 은퇴 여부.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Before,
    After,
}

impl Status {
    pub fn label_key(&self) -> &'static str {
        match self {
            Status::Before => keys::DIAGNOSTIC_STATUS_BEFORE,
            Status::After => keys::DIAGNOSTIC_STATUS_AFTER,
        }
    }
}

/// 연금 기관. `Other` 는 모르는 경우도 포함한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Organization {
    Cnss,
    Cmr,
    Rcar,
    Other,
}

/// 기관 연락처 (정적 데이터).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgContact {
    pub acronym: &'static str,
    pub website: &'static str,
    pub phone: &'static str,
}

impl Organization {
    pub const ALL: [Organization; 4] = [
        Organization::Cnss,
        Organization::Cmr,
        Organization::Rcar,
        Organization::Other,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            Organization::Cnss => keys::DIAGNOSTIC_ORG_CNSS,
            Organization::Cmr => keys::DIAGNOSTIC_ORG_CMR,
            Organization::Rcar => keys::DIAGNOSTIC_ORG_RCAR,
            Organization::Other => keys::DIAGNOSTIC_ORG_OTHER,
        }
    }

    pub fn contact(&self) -> Option<OrgContact> {
        match self {
            Organization::Cnss => Some(OrgContact {
                acronym: "CNSS",
                website: "https://www.cnss.ma",
                phone: "+212 (0) 522 47 76 60",
            }),
            Organization::Cmr => Some(OrgContact {
                acronym: "CMR",
                website: "https://www.cmr.gov.ma",
                phone: "+212 (0) 537 54 49 80",
            }),
            Organization::Rcar => Some(OrgContact {
                acronym: "RCAR",
                website: "https://www.rcar.org.ma",
                phone: "+212 (0) 537 71 44 44",
            }),
            Organization::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticInput {
    pub age: u32,
    pub status: Status,
    pub organization: Organization,
    pub years_worked: u32,
}

/// 진단 문구. 선택만 하고 문자열 변환은 렌더링 시점에 한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticMessage {
    StillTimeToPrepare,
    RetirementApproaching,
    Retired,
    LowYears,
    GoodYears,
    ContactOrganization(Organization),
    ConsultResources,
}

impl DiagnosticMessage {
    pub fn key(&self) -> &'static str {
        match self {
            DiagnosticMessage::StillTimeToPrepare => keys::DIAGNOSTIC_BEFORE_YOUNG,
            DiagnosticMessage::RetirementApproaching => keys::DIAGNOSTIC_BEFORE_SOON,
            DiagnosticMessage::Retired => keys::DIAGNOSTIC_AFTER,
            DiagnosticMessage::LowYears => keys::DIAGNOSTIC_LOW_YEARS,
            DiagnosticMessage::GoodYears => keys::DIAGNOSTIC_GOOD_YEARS,
            DiagnosticMessage::ContactOrganization(_) => keys::DIAGNOSTIC_CONTACT_ORG,
            DiagnosticMessage::ConsultResources => keys::DIAGNOSTIC_CONTACT_RESOURCES,
        }
    }

    pub fn render(&self, tr: &LocaleView<'_>) -> String {
        match self {
            DiagnosticMessage::ContactOrganization(org) => match org.contact() {
                Some(c) => tr.tf(
                    self.key(),
                    &[
                        ("org", c.acronym.to_string()),
                        ("website", c.website.to_string()),
                        ("phone", c.phone.to_string()),
                    ],
                ),
                None => tr.t(keys::DIAGNOSTIC_CONTACT_RESOURCES),
            },
            other => tr.t(other.key()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub messages: Vec<DiagnosticMessage>,
}

impl DiagnosticReport {
    pub fn render(&self, tr: &LocaleView<'_>) -> Vec<String> {
        self.messages.iter().map(|m| m.render(tr)).collect()
    }

    pub fn contains(&self, msg: DiagnosticMessage) -> bool {
        self.messages.contains(&msg)
    }
}

/// 나이/연수 임계값만으로 안내 문구를 고른다.
pub fn diagnose(input: &DiagnosticInput, t: &DiagnosticThresholds) -> DiagnosticReport {
    let mut messages = Vec::new();
    messages.push(match input.status {
        Status::After => DiagnosticMessage::Retired,
        Status::Before if input.age < t.approaching_age => DiagnosticMessage::StillTimeToPrepare,
        Status::Before => DiagnosticMessage::RetirementApproaching,
    });
    if input.years_worked < t.low_years {
        messages.push(DiagnosticMessage::LowYears);
    } else if input.years_worked >= t.good_years {
        messages.push(DiagnosticMessage::GoodYears);
    }
    messages.push(match input.organization {
        Organization::Other => DiagnosticMessage::ConsultResources,
        org => DiagnosticMessage::ContactOrganization(org),
    });
    log::debug!("diagnostic: {input:?} -> {messages:?}");
    DiagnosticReport { messages }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(age: u32, status: Status, years_worked: u32) -> DiagnosticInput {
        DiagnosticInput {
            age,
            status,
            organization: Organization::Other,
            years_worked,
        }
    }

    #[test]
    fn threshold_age_is_approaching() {
        let t = DiagnosticThresholds::default();
        let r = diagnose(&input(54, Status::Before, 15), &t);
        assert!(r.contains(DiagnosticMessage::StillTimeToPrepare));
        let r = diagnose(&input(55, Status::Before, 15), &t);
        assert!(r.contains(DiagnosticMessage::RetirementApproaching));
    }

    #[test]
    fn retired_ignores_age() {
        let r = diagnose(&input(40, Status::After, 15), &DiagnosticThresholds::default());
        assert_eq!(r.messages[0], DiagnosticMessage::Retired);
        assert_eq!(r.messages.len(), 2);
    }
}
