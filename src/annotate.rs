//! Annotator plugins
//!
//! Fixed hook points decorating generated declarations with
//! serialization metadata. Every hook is a no-op by default; multiple
//! annotators compose and run in registration order.

use serde_json::Value;

use crate::builder::{
    AccessorDecl, AnnotationSite, EnumConstantDecl, FieldDecl, TypeBuilder, TypeHandle,
};
use crate::config::AnnotationStyle;
use crate::error::Result;

/// Hook points invoked by the rule engine as declarations are built.
pub trait Annotator {
    /// After a type shell is declared
    fn annotate_type(
        &self,
        _builder: &mut dyn TypeBuilder,
        _handle: TypeHandle,
        _schema: &Value,
    ) -> Result<()> {
        Ok(())
    }

    /// After a field is added for a declared property
    fn annotate_property(
        &self,
        _builder: &mut dyn TypeBuilder,
        _handle: TypeHandle,
        _field: &FieldDecl,
        _schema: &Value,
    ) -> Result<()> {
        Ok(())
    }

    /// After an accessor is added for a field
    fn annotate_accessor(
        &self,
        _builder: &mut dyn TypeBuilder,
        _handle: TypeHandle,
        _accessor: &AccessorDecl,
        _field: &FieldDecl,
    ) -> Result<()> {
        Ok(())
    }

    /// After an enum constant is added
    fn annotate_enum_constant(
        &self,
        _builder: &mut dyn TypeBuilder,
        _handle: TypeHandle,
        _constant: &EnumConstantDecl,
    ) -> Result<()> {
        Ok(())
    }
}

/// Annotator that leaves declarations untouched.
pub struct NoopAnnotator;

impl Annotator for NoopAnnotator {}

/// Runs a list of annotators in fixed registration order.
#[derive(Default)]
pub struct CompositeAnnotator {
    annotators: Vec<Box<dyn Annotator>>,
}

impl CompositeAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, annotator: Box<dyn Annotator>) {
        self.annotators.push(annotator);
    }

    pub fn with(mut self, annotator: Box<dyn Annotator>) -> Self {
        self.push(annotator);
        self
    }
}

impl Annotator for CompositeAnnotator {
    fn annotate_type(
        &self,
        builder: &mut dyn TypeBuilder,
        handle: TypeHandle,
        schema: &Value,
    ) -> Result<()> {
        for annotator in &self.annotators {
            annotator.annotate_type(builder, handle, schema)?;
        }
        Ok(())
    }

    fn annotate_property(
        &self,
        builder: &mut dyn TypeBuilder,
        handle: TypeHandle,
        field: &FieldDecl,
        schema: &Value,
    ) -> Result<()> {
        for annotator in &self.annotators {
            annotator.annotate_property(builder, handle, field, schema)?;
        }
        Ok(())
    }

    fn annotate_accessor(
        &self,
        builder: &mut dyn TypeBuilder,
        handle: TypeHandle,
        accessor: &AccessorDecl,
        field: &FieldDecl,
    ) -> Result<()> {
        for annotator in &self.annotators {
            annotator.annotate_accessor(builder, handle, accessor, field)?;
        }
        Ok(())
    }

    fn annotate_enum_constant(
        &self,
        builder: &mut dyn TypeBuilder,
        handle: TypeHandle,
        constant: &EnumConstantDecl,
    ) -> Result<()> {
        for annotator in &self.annotators {
            annotator.annotate_enum_constant(builder, handle, constant)?;
        }
        Ok(())
    }
}

/// serde-style annotations: renames where the derived identifier
/// diverges from the source name, skip markers for optional fields.
pub struct SerdeStyleAnnotator;

impl Annotator for SerdeStyleAnnotator {
    fn annotate_property(
        &self,
        builder: &mut dyn TypeBuilder,
        handle: TypeHandle,
        field: &FieldDecl,
        _schema: &Value,
    ) -> Result<()> {
        if field.name != field.source_name {
            builder.add_annotation(
                handle,
                AnnotationSite::Field(field.name.clone()),
                &format!("serde(rename = \"{}\")", field.source_name),
            )?;
        }
        if !field.required {
            builder.add_annotation(
                handle,
                AnnotationSite::Field(field.name.clone()),
                "serde(skip_serializing_if = \"Option::is_none\")",
            )?;
        }
        Ok(())
    }

    fn annotate_enum_constant(
        &self,
        builder: &mut dyn TypeBuilder,
        handle: TypeHandle,
        constant: &EnumConstantDecl,
    ) -> Result<()> {
        let literal = match &constant.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if constant.name != literal {
            builder.add_annotation(
                handle,
                AnnotationSite::EnumConstant(constant.name.clone()),
                &format!("serde(rename = \"{literal}\")"),
            )?;
        }
        Ok(())
    }
}

/// Build the annotator stack for a configured style.
pub fn for_style(style: AnnotationStyle) -> CompositeAnnotator {
    match style {
        AnnotationStyle::None => CompositeAnnotator::new(),
        AnnotationStyle::Serde => CompositeAnnotator::new().with(Box::new(SerdeStyleAnnotator)),
    }
}
