//! wgslc module reflection.
//!
//! Read-only queries over a resolved module, answering what a host graphics
//! API needs to bind resources without re-parsing the shader: entry points,
//! per-entry-point resource bindings, and pipeline-overridable constants.

use std::collections::HashMap;

use log::debug;
use thiserror::Error;
use wgslc_ast::types::{self, MemoryLayout};
use wgslc_ast::{
    AccessControl, Function, GlobalVariable, Handle, Literal, Module, PipelineStage, ScalarKind,
    StorageClass, TextureClass, TextureDimension, Type, TypeInner,
};
use wgslc_resolver::ResolvedModule;

/// An inspector query failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InspectorError {
    #[error("module has unresolved errors")]
    UnresolvedModule,
    #[error("no function named `{0}`")]
    UnknownEntryPoint(String),
    #[error("`{0}` is not an entry point")]
    NotAnEntryPoint(String),
}

/// One entry point, as reported to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPoint {
    pub name: String,
    /// The name the entry point is emitted under. Currently the declared
    /// name; kept separate so backends can rename without breaking hosts.
    pub remapped_name: String,
    pub stage: PipelineStage,
    pub workgroup_size: [u32; 3],
}

/// One resource binding reachable from an entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingInfo {
    pub bind_group: u32,
    pub binding: u32,
    /// Bytes the bound buffer must provide; `None` for opaque resources.
    pub min_buffer_binding_size: Option<u64>,
    /// Texture dimension, for texture bindings.
    pub dim: Option<TextureDimension>,
    /// Sampled data kind, for texture bindings.
    pub sampled_kind: Option<ScalarKind>,
}

/// The value of a pipeline-overridable constant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    I32(i32),
    U32(u32),
    F32(f32),
}

impl From<Literal> for ScalarValue {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Bool(v) => Self::Bool(v),
            Literal::I32(v) => Self::I32(v),
            Literal::U32(v) => Self::U32(v),
            Literal::F32(v) => Self::F32(v),
        }
    }
}

/// Which globals a binding query selects.
#[derive(Clone, Copy)]
enum BindingKind {
    UniformBuffer,
    StorageBuffer,
    ReadOnlyStorageBuffer,
    Sampler,
    ComparisonSampler,
    SampledTexture,
    MultisampledTexture,
}

/// Read-only reflection over a module and its resolution output.
pub struct Inspector<'a> {
    module: &'a Module,
    resolved: &'a ResolvedModule,
}

impl<'a> Inspector<'a> {
    /// Wraps a resolved module. Fails if resolution reported errors; the
    /// metadata of a partially-resolved module is not trustworthy.
    pub fn new(module: &'a Module, resolved: &'a ResolvedModule) -> Result<Self, InspectorError> {
        if resolved.has_errors() {
            return Err(InspectorError::UnresolvedModule);
        }
        Ok(Self { module, resolved })
    }

    /// Enumerates entry points in declaration order.
    pub fn entry_points(&self) -> Vec<EntryPoint> {
        self.module
            .entry_points()
            .filter_map(|(_, function)| {
                let stage = function.stage?;
                let name = self
                    .module
                    .symbols
                    .name_of(function.name)
                    .unwrap_or("_")
                    .to_owned();
                Some(EntryPoint {
                    remapped_name: name.clone(),
                    name,
                    stage,
                    workgroup_size: function.workgroup_size.unwrap_or([1, 1, 1]),
                })
            })
            .collect()
    }

    /// Uniform buffers reachable from the named entry point.
    pub fn uniform_buffer_bindings(&self, entry: &str) -> Result<Vec<BindingInfo>, InspectorError> {
        self.bindings(entry, BindingKind::UniformBuffer)
    }

    /// Writable storage buffers reachable from the named entry point.
    /// Read-only storage buffers are excluded.
    pub fn storage_buffer_bindings(&self, entry: &str) -> Result<Vec<BindingInfo>, InspectorError> {
        self.bindings(entry, BindingKind::StorageBuffer)
    }

    /// Read-only storage buffers reachable from the named entry point.
    pub fn read_only_storage_buffer_bindings(
        &self,
        entry: &str,
    ) -> Result<Vec<BindingInfo>, InspectorError> {
        self.bindings(entry, BindingKind::ReadOnlyStorageBuffer)
    }

    /// Plain samplers reachable from the named entry point.
    pub fn sampler_bindings(&self, entry: &str) -> Result<Vec<BindingInfo>, InspectorError> {
        self.bindings(entry, BindingKind::Sampler)
    }

    /// Comparison samplers reachable from the named entry point.
    pub fn comparison_sampler_bindings(
        &self,
        entry: &str,
    ) -> Result<Vec<BindingInfo>, InspectorError> {
        self.bindings(entry, BindingKind::ComparisonSampler)
    }

    /// Sampled textures reachable from the named entry point.
    pub fn sampled_texture_bindings(
        &self,
        entry: &str,
    ) -> Result<Vec<BindingInfo>, InspectorError> {
        self.bindings(entry, BindingKind::SampledTexture)
    }

    /// Multisampled textures reachable from the named entry point.
    pub fn multisampled_texture_bindings(
        &self,
        entry: &str,
    ) -> Result<Vec<BindingInfo>, InspectorError> {
        self.bindings(entry, BindingKind::MultisampledTexture)
    }

    /// Pipeline-overridable constants keyed by their author-assigned id.
    /// A constant without an initializer reports `None`.
    pub fn constant_ids(&self) -> HashMap<u32, Option<ScalarValue>> {
        let mut out = HashMap::new();
        for (_, var) in self.module.global_variables.iter() {
            let Some(id) = var.constant_id else {
                continue;
            };
            let value = var.init.and_then(|init| {
                match self.module.expressions[init] {
                    wgslc_ast::Expression::Literal(literal) => Some(ScalarValue::from(literal)),
                    _ => None,
                }
            });
            out.insert(id, value);
        }
        out
    }

    fn entry_function(&self, entry: &str) -> Result<Handle<Function>, InspectorError> {
        let found = self
            .module
            .symbols
            .get(entry)
            .and_then(|sym| {
                self.module
                    .functions
                    .iter()
                    .find(|(_, f)| f.name == sym)
                    .map(|(h, _)| h)
            })
            .ok_or_else(|| InspectorError::UnknownEntryPoint(entry.to_owned()))?;
        if !self.module.functions[found].is_entry_point() {
            return Err(InspectorError::NotAnEntryPoint(entry.to_owned()));
        }
        Ok(found)
    }

    fn bindings(
        &self,
        entry: &str,
        kind: BindingKind,
    ) -> Result<Vec<BindingInfo>, InspectorError> {
        let function = self.entry_function(entry)?;
        let info = self.resolved.function_info(function);
        // BTreeSet iteration follows handle order, which is declaration
        // order, so reports are stable.
        let out: Vec<_> = info
            .referenced_globals
            .iter()
            .filter_map(|&global| self.classify(&self.module.global_variables[global], kind))
            .collect();
        debug!("`{entry}` reports {} binding(s)", out.len());
        Ok(out)
    }

    fn classify(&self, var: &GlobalVariable, kind: BindingKind) -> Option<BindingInfo> {
        let decoration = var.binding?;
        let types = &self.module.types;
        let report = |size, dim, sampled_kind| BindingInfo {
            bind_group: decoration.group,
            binding: decoration.binding,
            min_buffer_binding_size: size,
            dim,
            sampled_kind,
        };

        match kind {
            BindingKind::UniformBuffer => {
                if var.class != StorageClass::Uniform {
                    return None;
                }
                let size = types::min_buffer_binding_size(var.ty, MemoryLayout::UniformBuffer, types);
                Some(report(Some(size), None, None))
            }
            BindingKind::StorageBuffer | BindingKind::ReadOnlyStorageBuffer => {
                if var.class != StorageClass::Storage {
                    return None;
                }
                let read_only = is_read_only(var.ty, types);
                let wanted = matches!(kind, BindingKind::ReadOnlyStorageBuffer);
                if read_only != wanted {
                    return None;
                }
                let size = types::min_buffer_binding_size(var.ty, MemoryLayout::StorageBuffer, types);
                Some(report(Some(size), None, None))
            }
            BindingKind::Sampler | BindingKind::ComparisonSampler => {
                let resolved = types::unwrap_if_needed(var.ty, types);
                let TypeInner::Sampler { comparison } = types[resolved].inner else {
                    return None;
                };
                let wanted = matches!(kind, BindingKind::ComparisonSampler);
                (comparison == wanted).then(|| report(None, None, None))
            }
            BindingKind::SampledTexture | BindingKind::MultisampledTexture => {
                let resolved = types::unwrap_if_needed(var.ty, types);
                let TypeInner::Texture { dim, class } = types[resolved].inner else {
                    return None;
                };
                let scalar = match (kind, class) {
                    (BindingKind::SampledTexture, TextureClass::Sampled { scalar }) => scalar,
                    (BindingKind::MultisampledTexture, TextureClass::Multisampled { scalar }) => {
                        scalar
                    }
                    _ => return None,
                };
                Some(report(None, Some(dim), Some(scalar.kind)))
            }
        }
    }
}

/// Does the type carry a read-only access decoration under its aliases?
fn is_read_only(ty: Handle<Type>, types: &wgslc_ast::UniqueArena<Type>) -> bool {
    let mut current = ty;
    loop {
        match types[current].inner {
            TypeInner::Alias { base } => current = base,
            TypeInner::AccessControl { access, base } => match access {
                AccessControl::ReadOnly => return true,
                _ => current = base,
            },
            _ => return false,
        }
    }
}
