//! Human-readable model names for logging and auditing.

/// Description of a data model exposed by a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: &'static str,
    pub verbose_name: &'static str,
}

impl ModelInfo {
    pub const fn new(name: &'static str, verbose_name: &'static str) -> Self {
        Self { name, verbose_name }
    }
}

/// Something that yields rows of a model
pub trait QuerySource {
    fn model(&self) -> Option<ModelInfo>;
}

/// A view backed by a queryset and/or a serializer
pub trait ModelView {
    fn queryset_model(&self) -> Option<ModelInfo>;
    fn serializer_model(&self) -> Option<ModelInfo>;
}

/// Static model description attached to a route as resource data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewModels {
    pub queryset: Option<ModelInfo>,
    pub serializer: Option<ModelInfo>,
}

impl ViewModels {
    pub const fn queryset(model: ModelInfo) -> Self {
        Self {
            queryset: Some(model),
            serializer: None,
        }
    }

    pub const fn serializer(model: ModelInfo) -> Self {
        Self {
            queryset: None,
            serializer: Some(model),
        }
    }
}

impl ModelView for ViewModels {
    fn queryset_model(&self) -> Option<ModelInfo> {
        self.queryset
    }

    fn serializer_model(&self) -> Option<ModelInfo> {
        self.serializer
    }
}

impl QuerySource for ModelInfo {
    fn model(&self) -> Option<ModelInfo> {
        Some(*self)
    }
}

/// Resolve the display name of the model a request operates on
///
/// Sources are tried in order: the queryset's model, the view's queryset
/// model, the view's serializer model, then the explicit `model`. The
/// first hit wins; an empty string is returned when all of them miss.
pub fn get_verbose_name(
    queryset: Option<&dyn QuerySource>,
    view: Option<&dyn ModelView>,
    model: Option<ModelInfo>,
) -> String {
    let strategies: [&dyn Fn() -> Option<ModelInfo>; 4] = [
        &|| queryset.and_then(|q| q.model()),
        &|| view.and_then(|v| v.queryset_model()),
        &|| view.and_then(|v| v.serializer_model()),
        &|| model,
    ];

    strategies
        .iter()
        .find_map(|strategy| strategy())
        .map(|model| model.verbose_name.to_string())
        .unwrap_or_default()
}
