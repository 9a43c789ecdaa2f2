//! Best-effort task and audience inference
//!
//! Approximate by nature: case-insensitive substring checks against a fixed
//! keyword list, first matching rule wins. Kept apart from the quadrant
//! classifier, which must be exact.
//!
//! Keyword lists carry English terms and the Portuguese terms used by
//! earlier exported analyses.

use crate::types::TaskDefinition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Financial,
    Commerce,
    Onboarding,
    Analytics,
    Settings,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserProfile {
    Business,
    Accessibility,
    Mobile,
    Consumer,
}

/// Ordered (keywords, label) rules; the first rule with any hit wins
const TASK_TYPE_RULES: &[(&[&str], TaskType)] = &[
    (
        &["payment", "pay ", "transfer", "pix", "pagamento", "pagar", "transferência"],
        TaskType::Financial,
    ),
    (
        &["purchase", "cart", "product", "checkout", "compra", "carrinho", "produto"],
        TaskType::Commerce,
    ),
    (
        &["sign up", "signup", "register", "profile", "cadastro", "perfil", "registro"],
        TaskType::Onboarding,
    ),
    (
        &["report", "statement", "history", "query", "consulta", "relatório", "extrato", "histórico"],
        TaskType::Analytics,
    ),
    (
        &["setting", "preference", "configur", "adjust", "configuração", "ajuste", "preferência"],
        TaskType::Settings,
    ),
];

const USER_PROFILE_RULES: &[(&[&str], UserProfile)] = &[
    (
        &["professional", "company", "corporate", "enterprise", "profissional", "empresa", "corporativo"],
        UserProfile::Business,
    ),
    (
        &["elderly", "accessib", "simple", "idoso", "acessibilidade", "simples"],
        UserProfile::Accessibility,
    ),
    (
        &["mobile", "phone", "quick", "fast", "móvel", "celular", "rápido"],
        UserProfile::Mobile,
    ),
];

fn combined_text(definition: &TaskDefinition) -> String {
    format!(
        "{} {} {}",
        definition.name, definition.description, definition.job_to_be_done
    )
    .to_lowercase()
}

fn first_match<T: Copy>(text: &str, rules: &[(&[&str], T)], fallback: T) -> T {
    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(_, label)| *label)
        .unwrap_or(fallback)
}

/// True when `text` contains any of `keywords`, ignoring case
pub fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

/// True when `text` holds any of `words` as a whole word, ignoring case
pub fn mentions_word(text: &str, words: &[&str]) -> bool {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| words.contains(&token))
}

pub fn infer_task_type(definition: &TaskDefinition) -> TaskType {
    first_match(&combined_text(definition), TASK_TYPE_RULES, TaskType::General)
}

pub fn infer_user_profile(definition: &TaskDefinition) -> UserProfile {
    first_match(&combined_text(definition), USER_PROFILE_RULES, UserProfile::Consumer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, description: &str, jtbd: &str) -> TaskDefinition {
        TaskDefinition::new(name, description, jtbd)
    }

    #[test]
    fn test_financial() {
        let d = def("Instant transfer", "Send money with a key", "When I owe someone");
        assert_eq!(infer_task_type(&d), TaskType::Financial);
    }

    #[test]
    fn test_legacy_portuguese_keywords() {
        let d = def("Pagamento via Pix", "Pagar na hora", "Quando preciso pagar");
        assert_eq!(infer_task_type(&d), TaskType::Financial);
        let d = def("Consultar Extrato", "", "entender meus gastos");
        assert_eq!(infer_task_type(&d), TaskType::Analytics);
    }

    #[test]
    fn test_first_rule_wins() {
        // mentions both a payment and a report; financial is listed first
        let d = def("Payment report", "Monthly statement of payments", "");
        assert_eq!(infer_task_type(&d), TaskType::Financial);
    }

    #[test]
    fn test_case_insensitive() {
        let d = def("CHECKOUT", "", "");
        assert_eq!(infer_task_type(&d), TaskType::Commerce);
    }

    #[test]
    fn test_general_fallback() {
        let d = def("Water the plants", "Garden chores", "Keep them alive");
        assert_eq!(infer_task_type(&d), TaskType::General);
        assert_eq!(infer_user_profile(&d), UserProfile::Consumer);
    }

    #[test]
    fn test_user_profiles() {
        assert_eq!(
            infer_user_profile(&def("Expense approval", "For company admins", "")),
            UserProfile::Business
        );
        assert_eq!(
            infer_user_profile(&def("Pension lookup", "Simple flow for elderly users", "")),
            UserProfile::Accessibility
        );
        assert_eq!(
            infer_user_profile(&def("Top up", "On the phone", "I need it fast")),
            UserProfile::Mobile
        );
    }

    #[test]
    fn test_presets_infer_their_domain() {
        use crate::wizard::{presets, reduce, Action, WizardState};

        let expected = [
            ("instant-payment", TaskType::Financial),
            ("statement", TaskType::Analytics),
            ("password-recovery", TaskType::General),
            ("personal-loan", TaskType::General),
        ];
        for (id, task_type) in expected {
            let preset = presets()
                .into_iter()
                .find(|p| p.id == id)
                .expect("preset exists");
            let state = reduce(&WizardState::default(), Action::LoadPreset(preset));
            assert_eq!(infer_task_type(&state.definition), task_type, "{}", id);
        }
    }

    #[test]
    fn test_account_alone_is_not_onboarding() {
        let d = def("Account statement", "Past transactions", "");
        assert_eq!(infer_task_type(&d), TaskType::Analytics);
        let d = def("Create your profile", "", "");
        assert_eq!(infer_task_type(&d), TaskType::Onboarding);
    }

    #[test]
    fn test_mentions_word() {
        assert!(mentions_word("New account", &["new"]));
        assert!(mentions_word("Pagamento (novo)", &["novo"]));
        assert!(!mentions_word("Renew insurance policy", &["new"]));
        assert!(!mentions_word("Newsletter signup", &["new"]));
    }

    #[test]
    fn test_mentions_any() {
        assert!(mentions_any("I need this URGENTLY", &["urgent"]));
        assert!(!mentions_any("calm task", &["urgent", "fast"]));
    }
}
