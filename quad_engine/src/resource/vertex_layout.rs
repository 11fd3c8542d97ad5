/// VertexLayout - how the bytes of one vertex map to shader inputs

use crate::error::{Error, Result};
use crate::graphics_device::ComponentType;

/// Largest component count of one attribute (a vec4)
pub const MAX_COMPONENTS: u32 = 4;

/// Rust scalar types usable as vertex attribute components
pub trait VertexComponent {
    const COMPONENT_TYPE: ComponentType;
    /// Integer data is rescaled to [0, 1] when normalized
    const NORMALIZED: bool;
}

impl VertexComponent for f32 {
    const COMPONENT_TYPE: ComponentType = ComponentType::Float;
    const NORMALIZED: bool = false;
}

impl VertexComponent for u32 {
    const COMPONENT_TYPE: ComponentType = ComponentType::UnsignedInt;
    const NORMALIZED: bool = false;
}

impl VertexComponent for u8 {
    const COMPONENT_TYPE: ComponentType = ComponentType::UnsignedByte;
    const NORMALIZED: bool = true;
}

/// One attribute of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub component_type: ComponentType,
    pub component_count: u32,
    pub normalized: bool,
    /// Offset in bytes from the start of the vertex
    pub offset: u32,
}

impl VertexAttribute {
    /// Size in bytes of the whole attribute
    pub fn size_bytes(&self) -> u32 {
        self.component_type.size_bytes() * self.component_count
    }
}

/// Ordered attribute list plus running stride
///
/// Append-only: attributes are pushed in shader-location order, each one
/// placed right after the previous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: u32,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute of `component_count` components of type `T`
    ///
    /// # Example
    ///
    /// ```
    /// use quad_engine::quad::resource::VertexLayout;
    ///
    /// let mut layout = VertexLayout::new();
    /// layout.push::<f32>(2).unwrap();
    /// assert_eq!(layout.stride(), 8);
    /// ```
    pub fn push<T: VertexComponent>(&mut self, component_count: u32) -> Result<&mut Self> {
        self.push_attribute(T::COMPONENT_TYPE, component_count, T::NORMALIZED)
    }

    /// Untyped form of `push`
    pub fn push_attribute(
        &mut self,
        component_type: ComponentType,
        component_count: u32,
        normalized: bool,
    ) -> Result<&mut Self> {
        if !(1..=MAX_COMPONENTS).contains(&component_count) {
            return Err(Error::InvalidResource(format!(
                "vertex attribute needs 1 to {} components, got {}",
                MAX_COMPONENTS, component_count
            )));
        }

        let stride = component_type
            .size_bytes()
            .checked_mul(component_count)
            .and_then(|size| self.stride.checked_add(size))
            .ok_or_else(|| {
                Error::InvalidResource(format!(
                    "vertex stride overflows after {} attributes",
                    self.attributes.len()
                ))
            })?;

        self.attributes.push(VertexAttribute {
            component_type,
            component_count,
            normalized,
            offset: self.stride,
        });
        self.stride = stride;
        Ok(self)
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Size in bytes of one vertex
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
#[path = "vertex_layout_tests.rs"]
mod tests;
