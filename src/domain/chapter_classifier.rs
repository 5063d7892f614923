//! 章节类型分类器
//!
//! 按有序规则表把章节名映射为 `ChapterType`。第一条命中的规则生效，
//! 未命中或名称为空时返回 `None`。

use super::title::ChapterType;

/// 规则谓词（作用于小写化后的章节名）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePredicate {
    /// 名称包含子串
    Contains(&'static str),
    /// 名称以前缀开头
    StartsWith(&'static str),
    /// 名称以前缀开头且包含子串
    StartsWithContaining(&'static str, &'static str),
}

impl NamePredicate {
    fn matches(&self, name: &str) -> bool {
        match self {
            NamePredicate::Contains(needle) => name.contains(needle),
            NamePredicate::StartsWith(prefix) => name.starts_with(prefix),
            NamePredicate::StartsWithContaining(prefix, needle) => {
                name.starts_with(prefix) && name.contains(needle)
            }
        }
    }
}

/// 分类规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierRule {
    pub predicate: NamePredicate,
    pub category: ChapterType,
}

impl ClassifierRule {
    pub const fn new(predicate: NamePredicate, category: ChapterType) -> Self {
        Self {
            predicate,
            category,
        }
    }
}

/// 默认规则表（俄语站点）
///
/// 顺序即优先级，不得随意调整
pub const DEFAULT_RULES: &[ClassifierRule] = &[
    ClassifierRule::new(NamePredicate::Contains("послесловие"), ChapterType::Afterword),
    ClassifierRule::new(
        NamePredicate::StartsWithContaining("начальные", "иллюстрации"),
        ChapterType::Art,
    ),
    ClassifierRule::new(NamePredicate::Contains("эпилог"), ChapterType::Epilogue),
    ClassifierRule::new(
        NamePredicate::StartsWithContaining("дополнительн", "истори"),
        ChapterType::Extra,
    ),
    ClassifierRule::new(
        NamePredicate::StartsWithContaining("бонус", "истори"),
        ChapterType::Extra,
    ),
    ClassifierRule::new(NamePredicate::StartsWith("экстра"), ChapterType::Extra),
    ClassifierRule::new(NamePredicate::StartsWith("глоссарий"), ChapterType::Glossary),
    ClassifierRule::new(NamePredicate::Contains("пролог"), ChapterType::Prologue),
    ClassifierRule::new(
        NamePredicate::StartsWithContaining("реквизиты", "переводчик"),
        ChapterType::Trash,
    ),
    ClassifierRule::new(
        NamePredicate::StartsWithContaining("примечани", "переводчик"),
        ChapterType::Trash,
    ),
];

/// 章节类型分类器
#[derive(Debug, Clone)]
pub struct ChapterClassifier {
    rules: Vec<ClassifierRule>,
}

impl Default for ChapterClassifier {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
        }
    }
}

impl ChapterClassifier {
    /// 使用自定义规则表（站点覆盖）
    pub fn with_rules(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    /// 判定章节类型
    pub fn classify(&self, name: Option<&str>) -> Option<ChapterType> {
        let name = name.map(str::trim).filter(|n| !n.is_empty())?.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(&name))
            .map(|rule| rule.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(name: &str) -> Option<ChapterType> {
        ChapterClassifier::default().classify(Some(name))
    }

    #[test]
    fn test_each_category() {
        assert_eq!(classify("Послесловие автора"), Some(ChapterType::Afterword));
        assert_eq!(classify("Начальные иллюстрации"), Some(ChapterType::Art));
        assert_eq!(classify("Эпилог"), Some(ChapterType::Epilogue));
        assert_eq!(classify("Дополнительная история: лето"), Some(ChapterType::Extra));
        assert_eq!(classify("Экстра 3"), Some(ChapterType::Extra));
        assert_eq!(classify("Глоссарий"), Some(ChapterType::Glossary));
        assert_eq!(classify("Пролог"), Some(ChapterType::Prologue));
        assert_eq!(classify("Реквизиты переводчика"), Some(ChapterType::Trash));
        assert_eq!(classify("Примечания переводчика"), Some(ChapterType::Trash));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // 同时命中 extra 与 prologue，extra 排在前面
        assert_eq!(classify("Бонусная история. Пролог"), Some(ChapterType::Extra));
        // afterword 优先于 epilogue
        assert_eq!(classify("Эпилог и послесловие"), Some(ChapterType::Afterword));
    }

    #[test]
    fn test_never_assigns_generic_chapter() {
        assert_eq!(classify("Глава 12. Встреча"), None);
        assert_eq!(classify("Том 1 Глава 1"), None);
    }

    #[test]
    fn test_empty_or_missing_name() {
        let classifier = ChapterClassifier::default();
        assert_eq!(classifier.classify(None), None);
        assert_eq!(classifier.classify(Some("")), None);
        assert_eq!(classifier.classify(Some("   ")), None);
    }

    #[test]
    fn test_prefix_rules_require_prefix() {
        // "бонус" 不在开头，不命中 extra，但包含 "пролог"
        assert_eq!(classify("Мой бонус: история и пролог"), Some(ChapterType::Prologue));
        assert_eq!(classify("Новый глоссарий"), None);
    }

    #[test]
    fn test_custom_rules_override() {
        let classifier = ChapterClassifier::with_rules(vec![ClassifierRule::new(
            NamePredicate::Contains("chapter"),
            ChapterType::Chapter,
        )]);
        assert_eq!(classifier.classify(Some("Chapter 1")), Some(ChapterType::Chapter));
        assert_eq!(classifier.classify(Some("Пролог")), None);
    }
}
