//! Annotation classification for scaffolding
//!
//! Scaffolding turns a model's annotations back into builder calls. For each annotation a
//! classifier answers two questions: would the zero-configuration model carry it anyway
//! ([`is_implied_by_convention`](AnnotationClassifier::is_implied_by_convention)), and which
//! call reproduces it ([`builder_call`](AnnotationClassifier::builder_call)).
//!
//! Classifiers only answer for the annotation names they own. A [`ClassifierRegistry`]
//! chains several of them and takes the first answer.

use std::borrow::Cow;

use pgschema_types::DialectVersion;
use pgschema_types::postgres::annotations::names;
use pgschema_types::postgres::ddl::{DEFAULT_SCHEMA, Enum, Extension, RangeType};
use pgschema_types::postgres::{Annotation, AnnotationError, AnnotationValue, ValueGenerationStrategy};

use super::codegen::{BuilderCall, CallArgument};
use crate::error::MigrationError;

/// What an annotation is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationTarget {
    Model,
    Table,
    Column,
    Index,
}

pub trait AnnotationClassifier {
    /// Returns `true` when the annotation restates the conventional default.
    fn is_implied_by_convention(&self, target: AnnotationTarget, annotation: &Annotation) -> bool;

    /// The call reproducing `annotation`, or `None` when this classifier doesn't own it.
    ///
    /// # Errors
    ///
    /// Fails when an owned annotation carries an unexpected value or can't be scaffolded.
    fn builder_call(
        &self,
        target: AnnotationTarget,
        annotation: &Annotation,
    ) -> Result<Option<BuilderCall>, MigrationError>;
}

// =============================================================================
// PostgreSQL
// =============================================================================

/// Classifier for the `Postgres:` annotations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostgresAnnotationClassifier {
    pub version: Option<DialectVersion>,
}

impl PostgresAnnotationClassifier {
    #[must_use]
    pub const fn new(version: Option<DialectVersion>) -> Self {
        Self { version }
    }

    fn model_call(annotation: &Annotation) -> Result<Option<BuilderCall>, MigrationError> {
        let name = annotation.name.as_ref();

        if name.starts_with(names::EXTENSION_PREFIX) {
            let extension = Extension::from_annotation(annotation)?;
            return Ok(Some(
                BuilderCall::new("has_postgres_extension").arg(CallArgument::Str(extension.name)),
            ));
        }

        if name.starts_with(names::ENUM_PREFIX) {
            let Enum { schema, name, labels } = Enum::from_annotation(annotation)?;
            let mut call = BuilderCall::new("has_postgres_enum");
            if let Some(schema) = non_default_schema(schema) {
                call = call.arg(CallArgument::Str(schema));
            }
            return Ok(Some(
                call.arg(CallArgument::Str(name))
                    .arg(CallArgument::StrList(labels)),
            ));
        }

        if name.starts_with(names::RANGE_PREFIX) {
            let range = RangeType::from_annotation(annotation)?;
            let customized = range.has_customizations();
            let RangeType {
                schema,
                name,
                subtype,
                canonical_function,
                subtype_opclass,
                collation,
                subtype_diff,
            } = range;

            let mut call = BuilderCall::new("has_postgres_range")
                .arg(CallArgument::OptStr(non_default_schema(schema)))
                .arg(CallArgument::Str(name))
                .arg(CallArgument::Str(subtype));
            if customized {
                call = call
                    .arg(CallArgument::OptStr(canonical_function))
                    .arg(CallArgument::OptStr(subtype_opclass))
                    .arg(CallArgument::OptStr(collation))
                    .arg(CallArgument::OptStr(subtype_diff));
            }
            return Ok(Some(call));
        }

        Ok(None)
    }

    fn table_call(annotation: &Annotation) -> Result<Option<BuilderCall>, MigrationError> {
        let call = match annotation.name.as_ref() {
            names::COMMENT => BuilderCall::new("has_comment").arg(CallArgument::Str(text(annotation)?)),
            names::UNLOGGED_TABLE => match annotation.value {
                AnnotationValue::Bool(unlogged) => {
                    BuilderCall::new("is_unlogged").arg(CallArgument::Bool(unlogged))
                }
                _ => return Err(unexpected(annotation, "bool")),
            },
            _ => return Ok(None),
        };
        Ok(Some(call))
    }

    fn column_call(annotation: &Annotation) -> Result<Option<BuilderCall>, MigrationError> {
        match annotation.name.as_ref() {
            names::VALUE_GENERATION_STRATEGY => {
                let AnnotationValue::Strategy(strategy) = annotation.value else {
                    return Err(unexpected(annotation, "strategy"));
                };
                let method = match strategy {
                    ValueGenerationStrategy::SerialColumn => "use_serial_column",
                    ValueGenerationStrategy::IdentityAlwaysColumn => "use_identity_always_column",
                    ValueGenerationStrategy::IdentityByDefaultColumn => "use_identity_by_default_column",
                    // HiLo columns are configured through the model-wide sequence
                    ValueGenerationStrategy::SequenceHiLo => {
                        return Err(MigrationError::HiLoScaffolding(annotation.name.to_string()));
                    }
                    ValueGenerationStrategy::None => return Ok(None),
                };
                Ok(Some(BuilderCall::new(method)))
            }
            names::COMMENT => Ok(Some(
                BuilderCall::new("has_comment").arg(CallArgument::Str(text(annotation)?)),
            )),
            _ => Ok(None),
        }
    }

    fn index_call(annotation: &Annotation) -> Result<Option<BuilderCall>, MigrationError> {
        let call = match annotation.name.as_ref() {
            names::INDEX_METHOD => BuilderCall::new("has_method").arg(CallArgument::Str(text(annotation)?)),
            names::INDEX_OPERATORS => {
                BuilderCall::new("has_operators").arg(CallArgument::StrList(text_list(annotation)?))
            }
            names::INDEX_COLLATION => {
                BuilderCall::new("has_collation").arg(CallArgument::StrList(text_list(annotation)?))
            }
            names::INDEX_SORT_ORDER => match &annotation.value {
                AnnotationValue::SortOrders(orders) => {
                    BuilderCall::new("has_sort_order").arg(CallArgument::SortOrders(orders.clone()))
                }
                _ => return Err(unexpected(annotation, "sort orders")),
            },
            names::INDEX_NULL_SORT_ORDER => match &annotation.value {
                AnnotationValue::NullSortOrders(orders) => BuilderCall::new("has_null_sort_order")
                    .arg(CallArgument::NullSortOrders(orders.clone())),
                _ => return Err(unexpected(annotation, "null sort orders")),
            },
            names::INDEX_INCLUDE => {
                BuilderCall::new("include_properties").arg(CallArgument::StrList(text_list(annotation)?))
            }
            _ => return Ok(None),
        };
        Ok(Some(call))
    }
}

impl AnnotationClassifier for PostgresAnnotationClassifier {
    fn is_implied_by_convention(&self, target: AnnotationTarget, annotation: &Annotation) -> bool {
        match (target, annotation.name.as_ref()) {
            (AnnotationTarget::Model, names::DEFAULT_SCHEMA) => {
                annotation.value.as_text() == Some(DEFAULT_SCHEMA)
            }
            (AnnotationTarget::Index, names::INDEX_METHOD) => annotation.value.as_text() == Some("btree"),
            (AnnotationTarget::Column, names::VALUE_GENERATION_STRATEGY) => {
                annotation.value
                    == AnnotationValue::Strategy(ValueGenerationStrategy::conventional(self.version))
            }
            _ => false,
        }
    }

    fn builder_call(
        &self,
        target: AnnotationTarget,
        annotation: &Annotation,
    ) -> Result<Option<BuilderCall>, MigrationError> {
        match target {
            AnnotationTarget::Model => Self::model_call(annotation),
            AnnotationTarget::Table => Self::table_call(annotation),
            AnnotationTarget::Column => Self::column_call(annotation),
            AnnotationTarget::Index => Self::index_call(annotation),
        }
    }
}

fn non_default_schema(schema: Option<Cow<'static, str>>) -> Option<Cow<'static, str>> {
    schema.filter(|s| s != DEFAULT_SCHEMA)
}

fn unexpected(annotation: &Annotation, expected: &'static str) -> MigrationError {
    MigrationError::Annotation(AnnotationError::UnexpectedValue {
        name: annotation.name.to_string(),
        expected,
        found: annotation.value.kind(),
    })
}

fn text(annotation: &Annotation) -> Result<Cow<'static, str>, MigrationError> {
    match &annotation.value {
        AnnotationValue::Text(s) => Ok(s.clone()),
        _ => Err(unexpected(annotation, "text")),
    }
}

fn text_list(annotation: &Annotation) -> Result<Vec<Cow<'static, str>>, MigrationError> {
    match &annotation.value {
        AnnotationValue::TextList(values) => Ok(values.clone()),
        _ => Err(unexpected(annotation, "text list")),
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Ordered chain of classifiers
#[derive(Default)]
pub struct ClassifierRegistry {
    classifiers: Vec<Box<dyn AnnotationClassifier + Send + Sync>>,
}

impl ClassifierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the PostgreSQL classifier
    #[must_use]
    pub fn postgres(version: Option<DialectVersion>) -> Self {
        Self::new().with(PostgresAnnotationClassifier::new(version))
    }

    #[must_use]
    pub fn with(mut self, classifier: impl AnnotationClassifier + Send + Sync + 'static) -> Self {
        self.register(classifier);
        self
    }

    pub fn register(&mut self, classifier: impl AnnotationClassifier + Send + Sync + 'static) {
        self.classifiers.push(Box::new(classifier));
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    pub fn is_implied_by_convention(&self, target: AnnotationTarget, annotation: &Annotation) -> bool {
        self.classifiers
            .iter()
            .any(|c| c.is_implied_by_convention(target, annotation))
    }

    /// First classifier to claim the annotation wins
    pub fn builder_call(
        &self,
        target: AnnotationTarget,
        annotation: &Annotation,
    ) -> Result<Option<BuilderCall>, MigrationError> {
        for classifier in &self.classifiers {
            if let Some(call) = classifier.builder_call(target, annotation)? {
                return Ok(Some(call));
            }
        }
        Ok(None)
    }

    /// Calls for every annotation that is neither implied by convention nor unclaimed
    pub fn scaffold(
        &self,
        target: AnnotationTarget,
        annotations: &[Annotation],
    ) -> Result<Vec<BuilderCall>, MigrationError> {
        let mut calls = Vec::new();
        for annotation in annotations {
            if self.is_implied_by_convention(target, annotation) {
                continue;
            }
            if let Some(call) = self.builder_call(target, annotation)? {
                calls.push(call);
            }
        }
        Ok(calls)
    }
}

impl std::fmt::Debug for ClassifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierRegistry")
            .field("classifiers", &self.classifiers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(s: ValueGenerationStrategy) -> Annotation {
        Annotation::new(names::VALUE_GENERATION_STRATEGY, AnnotationValue::Strategy(s))
    }

    fn call(target: AnnotationTarget, annotation: &Annotation) -> Option<String> {
        PostgresAnnotationClassifier::default()
            .builder_call(target, annotation)
            .unwrap()
            .map(|c| c.to_string())
    }

    #[test]
    fn test_conventional_strategy_depends_on_version() {
        let pre10 = PostgresAnnotationClassifier::new(Some(DialectVersion::new(9, 6)));
        let modern = PostgresAnnotationClassifier::new(Some(DialectVersion::V10));
        let unknown = PostgresAnnotationClassifier::new(None);

        let serial = strategy(ValueGenerationStrategy::SerialColumn);
        let identity = strategy(ValueGenerationStrategy::IdentityByDefaultColumn);

        assert!(pre10.is_implied_by_convention(AnnotationTarget::Column, &serial));
        assert!(!pre10.is_implied_by_convention(AnnotationTarget::Column, &identity));
        assert!(modern.is_implied_by_convention(AnnotationTarget::Column, &identity));
        assert!(!modern.is_implied_by_convention(AnnotationTarget::Column, &serial));
        assert!(unknown.is_implied_by_convention(AnnotationTarget::Column, &identity));
    }

    #[test]
    fn test_default_schema_and_btree_are_implied() {
        let classifier = PostgresAnnotationClassifier::default();
        assert!(classifier.is_implied_by_convention(
            AnnotationTarget::Model,
            &Annotation::text(names::DEFAULT_SCHEMA, "public")
        ));
        assert!(!classifier.is_implied_by_convention(
            AnnotationTarget::Model,
            &Annotation::text(names::DEFAULT_SCHEMA, "app")
        ));
        assert!(classifier.is_implied_by_convention(
            AnnotationTarget::Index,
            &Annotation::text(names::INDEX_METHOD, "btree")
        ));
        assert!(!classifier.is_implied_by_convention(
            AnnotationTarget::Index,
            &Annotation::text(names::INDEX_METHOD, "gin")
        ));
    }

    #[test]
    fn test_enum_schema_omitted_when_public() {
        let public = Enum::new(Some("public"), "mood", ["happy", "sad"]).to_annotation();
        let app = Enum::new(Some("app"), "mood", ["happy", "sad"]).to_annotation();

        assert_eq!(
            call(AnnotationTarget::Model, &public).as_deref(),
            Some(r#".has_postgres_enum("mood", &["happy", "sad"])"#)
        );
        assert_eq!(
            call(AnnotationTarget::Model, &app).as_deref(),
            Some(r#".has_postgres_enum("app", "mood", &["happy", "sad"])"#)
        );
    }

    #[test]
    fn test_range_hooks_only_when_customized() {
        let plain = RangeType::new(None, "floatrange", "real").to_annotation();
        let custom = RangeType::new(Some("app"), "textrange", "text")
            .collation("C")
            .to_annotation();

        assert_eq!(
            call(AnnotationTarget::Model, &plain).as_deref(),
            Some(r#".has_postgres_range(None, "floatrange", "real")"#)
        );
        assert_eq!(
            call(AnnotationTarget::Model, &custom).as_deref(),
            Some(r#".has_postgres_range(Some("app"), "textrange", "text", None, None, Some("C"), None)"#)
        );
    }

    #[test]
    fn test_hilo_cannot_be_scaffolded() {
        let result = PostgresAnnotationClassifier::default().builder_call(
            AnnotationTarget::Column,
            &strategy(ValueGenerationStrategy::SequenceHiLo),
        );
        assert!(matches!(result, Err(MigrationError::HiLoScaffolding(_))));
    }

    #[test]
    fn test_foreign_annotations_are_not_claimed() {
        let foreign = Annotation::text("SqlServer:Clustered", "true");
        for target in [
            AnnotationTarget::Model,
            AnnotationTarget::Table,
            AnnotationTarget::Column,
            AnnotationTarget::Index,
        ] {
            assert_eq!(call(target, &foreign), None);
        }
    }

    #[test]
    fn test_wrong_value_kind_is_an_error() {
        let result = PostgresAnnotationClassifier::default().builder_call(
            AnnotationTarget::Table,
            &Annotation::text(names::UNLOGGED_TABLE, "yes"),
        );
        assert!(matches!(
            result,
            Err(MigrationError::Annotation(AnnotationError::UnexpectedValue { .. }))
        ));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let classifier = PostgresAnnotationClassifier::new(Some(DialectVersion::new(9, 6)));
        let annotation = strategy(ValueGenerationStrategy::SerialColumn);

        let first = (
            classifier.is_implied_by_convention(AnnotationTarget::Column, &annotation),
            classifier.builder_call(AnnotationTarget::Column, &annotation),
        );
        let second = (
            classifier.is_implied_by_convention(AnnotationTarget::Column, &annotation),
            classifier.builder_call(AnnotationTarget::Column, &annotation),
        );
        assert_eq!(first, second);
    }

    struct Clustered;

    impl AnnotationClassifier for Clustered {
        fn is_implied_by_convention(&self, _: AnnotationTarget, _: &Annotation) -> bool {
            false
        }

        fn builder_call(
            &self,
            target: AnnotationTarget,
            annotation: &Annotation,
        ) -> Result<Option<BuilderCall>, MigrationError> {
            Ok((target == AnnotationTarget::Index && annotation.name == "SqlServer:Clustered")
                .then(|| BuilderCall::new("is_clustered")))
        }
    }

    #[test]
    fn test_registry_chains_classifiers() {
        let registry = ClassifierRegistry::postgres(None).with(Clustered);
        assert_eq!(registry.len(), 2);

        let annotations = [
            Annotation::text(names::INDEX_METHOD, "btree"),
            Annotation::text("SqlServer:Clustered", "true"),
            Annotation::text_list(names::INDEX_INCLUDE, ["Name"]),
            Annotation::text("Other:Thing", "x"),
        ];
        let calls: Vec<_> = registry
            .scaffold(AnnotationTarget::Index, &annotations)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(calls, vec![".is_clustered()", r#".include_properties(&["Name"])"#]);
    }
}
