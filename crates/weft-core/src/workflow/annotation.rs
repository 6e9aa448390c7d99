use crate::entity::{EntityValue, Record, ToEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    PlainText,
    Html,
}

impl ContentType {
    fn tag(self) -> &'static str {
        match self {
            ContentType::PlainText => "text/plain",
            ContentType::Html => "text/html",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationText {
    pub value: String,
    pub content_type: ContentType,
}

impl AnnotationText {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            content_type: ContentType::PlainText,
        }
    }
}

impl ToEntity for AnnotationText {
    fn to_entity(&self) -> EntityValue {
        Record::new("annotationText")
            .with_field("value", self.value.as_str())
            .with_field("contentType", EntityValue::enum_tag(self.content_type.tag()))
            .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ToEntity for Bounds {
    fn to_entity(&self) -> EntityValue {
        Record::new("bounds")
            .with_field("x", self.x)
            .with_field("y", self.y)
            .with_field("width", self.width)
            .with_field("height", self.height)
            .into()
    }
}

/// Free-floating text on the workflow canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: String,
    pub text: AnnotationText,
    pub bounds: Bounds,
}

impl Annotation {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: AnnotationText::plain(text),
            bounds: Bounds::default(),
        }
    }
}

impl ToEntity for Annotation {
    fn to_entity(&self) -> EntityValue {
        Record::new("workflowAnnotation")
            .with_field("id", self.id.as_str())
            .with_field("text", self.text.to_entity())
            .with_field("bounds", self.bounds.to_entity())
            .into()
    }
}
