//! Enum tables of the wiki protocol.
//!
//! Callers address these enums by their abstract wire names (the
//! `DEEP_WIKI_*` constants of the service schema); this module owns the
//! fixed name/integer tables. Unknown names and unknown wire integers both
//! collapse to the `Unspecified` value of each table, never an error.

/// Kind of article the service is asked to produce
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestType {
    /// No request kind given
    #[default]
    Unspecified = 0,
    /// Short sidebar summary
    Sidebar = 1,
    /// Full explanatory article
    Article = 2,
}

impl RequestType {
    /// Map a wire integer to its enum value; unknown integers collapse to
    /// [`RequestType::Unspecified`].
    pub fn from_wire(value: u32) -> Self {
        match value {
            1 => RequestType::Sidebar,
            2 => RequestType::Article,
            _ => RequestType::Unspecified,
        }
    }

    /// Map an abstract wire name to its enum value; unknown names collapse
    /// to [`RequestType::Unspecified`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "DEEP_WIKI_REQUEST_TYPE_SIDEBAR" => RequestType::Sidebar,
            "DEEP_WIKI_REQUEST_TYPE_ARTICLE" => RequestType::Article,
            _ => RequestType::Unspecified,
        }
    }

    /// The abstract wire name of this value.
    pub fn wire_name(self) -> &'static str {
        match self {
            RequestType::Unspecified => "DEEP_WIKI_REQUEST_TYPE_UNSPECIFIED",
            RequestType::Sidebar => "DEEP_WIKI_REQUEST_TYPE_SIDEBAR",
            RequestType::Article => "DEEP_WIKI_REQUEST_TYPE_ARTICLE",
        }
    }
}

/// Model tier requested for article generation
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelType {
    /// No tier given
    #[default]
    Unspecified = 0,
    /// Fallback tier used when primary capacity is exhausted
    CapacityFallback = 1,
    /// Light tier, free plan
    LiteFree = 2,
    /// Light tier, paid plan
    LitePaid = 3,
    /// Premium tier
    Premium = 4,
}

impl ModelType {
    /// Map a wire integer to its enum value; unknown integers collapse to
    /// [`ModelType::Unspecified`].
    pub fn from_wire(value: u32) -> Self {
        match value {
            1 => ModelType::CapacityFallback,
            2 => ModelType::LiteFree,
            3 => ModelType::LitePaid,
            4 => ModelType::Premium,
            _ => ModelType::Unspecified,
        }
    }

    /// Map an abstract wire name to its enum value; unknown names collapse
    /// to [`ModelType::Unspecified`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "DEEP_WIKI_MODEL_TYPE_CAPACITY_FALLBACK" => ModelType::CapacityFallback,
            "DEEP_WIKI_MODEL_TYPE_LITE_FREE" => ModelType::LiteFree,
            "DEEP_WIKI_MODEL_TYPE_LITE_PAID" => ModelType::LitePaid,
            "DEEP_WIKI_MODEL_TYPE_PREMIUM" => ModelType::Premium,
            _ => ModelType::Unspecified,
        }
    }

    /// The abstract wire name of this value.
    pub fn wire_name(self) -> &'static str {
        match self {
            ModelType::Unspecified => "DEEP_WIKI_MODEL_TYPE_UNSPECIFIED",
            ModelType::CapacityFallback => "DEEP_WIKI_MODEL_TYPE_CAPACITY_FALLBACK",
            ModelType::LiteFree => "DEEP_WIKI_MODEL_TYPE_LITE_FREE",
            ModelType::LitePaid => "DEEP_WIKI_MODEL_TYPE_LITE_PAID",
            ModelType::Premium => "DEEP_WIKI_MODEL_TYPE_PREMIUM",
        }
    }
}

/// Kind of source symbol an article is requested for.
///
/// Mirrors the editor symbol-kind taxonomy, offset by the unspecified
/// value at 0.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub enum SymbolType {
    #[default]
    Unspecified = 0,
    File = 1,
    Module = 2,
    Namespace = 3,
    Package = 4,
    Class = 5,
    Method = 6,
    Property = 7,
    Field = 8,
    Constructor = 9,
    Enum = 10,
    Interface = 11,
    Function = 12,
    Variable = 13,
    Constant = 14,
    String = 15,
    Number = 16,
    Boolean = 17,
    Array = 18,
    Object = 19,
    Key = 20,
    Null = 21,
    EnumMember = 22,
    Struct = 23,
    Event = 24,
    Operator = 25,
    TypeParameter = 26,
}

/// Name/value table backing [`SymbolType::from_name`] and
/// [`SymbolType::wire_name`].
const SYMBOL_TYPE_TABLE: [(SymbolType, &str); 27] = [
    (SymbolType::Unspecified, "DEEP_WIKI_SYMBOL_TYPE_UNSPECIFIED"),
    (SymbolType::File, "DEEP_WIKI_SYMBOL_TYPE_FILE"),
    (SymbolType::Module, "DEEP_WIKI_SYMBOL_TYPE_MODULE"),
    (SymbolType::Namespace, "DEEP_WIKI_SYMBOL_TYPE_NAMESPACE"),
    (SymbolType::Package, "DEEP_WIKI_SYMBOL_TYPE_PACKAGE"),
    (SymbolType::Class, "DEEP_WIKI_SYMBOL_TYPE_CLASS"),
    (SymbolType::Method, "DEEP_WIKI_SYMBOL_TYPE_METHOD"),
    (SymbolType::Property, "DEEP_WIKI_SYMBOL_TYPE_PROPERTY"),
    (SymbolType::Field, "DEEP_WIKI_SYMBOL_TYPE_FIELD"),
    (SymbolType::Constructor, "DEEP_WIKI_SYMBOL_TYPE_CONSTRUCTOR"),
    (SymbolType::Enum, "DEEP_WIKI_SYMBOL_TYPE_ENUM"),
    (SymbolType::Interface, "DEEP_WIKI_SYMBOL_TYPE_INTERFACE"),
    (SymbolType::Function, "DEEP_WIKI_SYMBOL_TYPE_FUNCTION"),
    (SymbolType::Variable, "DEEP_WIKI_SYMBOL_TYPE_VARIABLE"),
    (SymbolType::Constant, "DEEP_WIKI_SYMBOL_TYPE_CONSTANT"),
    (SymbolType::String, "DEEP_WIKI_SYMBOL_TYPE_STRING"),
    (SymbolType::Number, "DEEP_WIKI_SYMBOL_TYPE_NUMBER"),
    (SymbolType::Boolean, "DEEP_WIKI_SYMBOL_TYPE_BOOLEAN"),
    (SymbolType::Array, "DEEP_WIKI_SYMBOL_TYPE_ARRAY"),
    (SymbolType::Object, "DEEP_WIKI_SYMBOL_TYPE_OBJECT"),
    (SymbolType::Key, "DEEP_WIKI_SYMBOL_TYPE_KEY"),
    (SymbolType::Null, "DEEP_WIKI_SYMBOL_TYPE_NULL"),
    (SymbolType::EnumMember, "DEEP_WIKI_SYMBOL_TYPE_ENUM_MEMBER"),
    (SymbolType::Struct, "DEEP_WIKI_SYMBOL_TYPE_STRUCT"),
    (SymbolType::Event, "DEEP_WIKI_SYMBOL_TYPE_EVENT"),
    (SymbolType::Operator, "DEEP_WIKI_SYMBOL_TYPE_OPERATOR"),
    (
        SymbolType::TypeParameter,
        "DEEP_WIKI_SYMBOL_TYPE_TYPE_PARAMETER",
    ),
];

impl SymbolType {
    /// Map a wire integer to its enum value; unknown integers collapse to
    /// [`SymbolType::Unspecified`].
    pub fn from_wire(value: u32) -> Self {
        SYMBOL_TYPE_TABLE
            .iter()
            .find(|(kind, _)| *kind as u32 == value)
            .map(|(kind, _)| *kind)
            .unwrap_or_default()
    }

    /// Map an abstract wire name to its enum value; unknown names collapse
    /// to [`SymbolType::Unspecified`].
    pub fn from_name(name: &str) -> Self {
        SYMBOL_TYPE_TABLE
            .iter()
            .find(|(_, wire_name)| *wire_name == name)
            .map(|(kind, _)| *kind)
            .unwrap_or_default()
    }

    /// The abstract wire name of this value.
    pub fn wire_name(self) -> &'static str {
        SYMBOL_TYPE_TABLE[self as usize].1
    }
}
