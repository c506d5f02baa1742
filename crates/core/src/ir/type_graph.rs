//! Type graph translation: reachable backend types to TypeScript declarations.
//!
//! The walk is an explicit work-list. A type is marked visited when it is
//! enqueued, so shared references and cycles (including self-references)
//! translate exactly once, and declarations come out in first-reference order.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use super::api::TranslatedType;
use super::types::{TsEnumMember, TsPrimitive, TsProp, TsType, TsTypeDef, TypeDefKind};
use super::utils::{apply_case, client_namespace, sanitize_ts_identifier};
use crate::cherry::{field_custom_name, member_cherry_type, Owner, PickStrength};
use crate::descriptor::{Builtin, MemberDescriptor, Snapshot, TypeDescriptor, TypeId, TypeRef};
use crate::error::{GenError, Result};
use crate::options::GenOptions;

/// Translator state for one run.
#[derive(Debug)]
pub struct TypeGraph<'a> {
    snapshot: &'a Snapshot,
    options: &'a GenOptions,
    queue: VecDeque<TypeId>,
    visited: HashSet<TypeId>,
    translated: Vec<TranslatedType>,
}

impl<'a> TypeGraph<'a> {
    /// Empty work-list over `snapshot`.
    pub fn new(snapshot: &'a Snapshot, options: &'a GenOptions) -> Self {
        Self {
            snapshot,
            options,
            queue: VecDeque::new(),
            visited: HashSet::new(),
            translated: Vec::new(),
        }
    }

    /// Schedule a type for translation unless it was already seen.
    pub fn enqueue(&mut self, id: TypeId) {
        if self.visited.insert(id.clone()) {
            self.queue.push_back(id);
        }
    }

    /// Translate every scheduled type and everything it references.
    pub fn drain(&mut self) -> Result<()> {
        let snapshot = self.snapshot;
        while let Some(id) = self.queue.pop_front() {
            // Only ids present in the snapshot are ever enqueued.
            let Some(desc) = snapshot.get(&id) else {
                continue;
            };
            let def = self.translate(desc)?;
            self.translated.push(TranslatedType { id, def });
        }
        debug!(types = self.translated.len(), "Translated type graph.");
        Ok(())
    }

    /// Declarations in first-reference order.
    pub fn into_types(self) -> Vec<TranslatedType> {
        self.translated
    }

    /// Map a type reference to a TypeScript type, scheduling the named types
    /// it mentions. `path` names the referencing site in error messages and
    /// `generics` lists the generic parameters in scope.
    pub fn map_ref(&mut self, ty: &TypeRef, path: &str, generics: &[String]) -> Result<TsType> {
        match ty {
            TypeRef::Builtin { name } => {
                let builtin = Builtin::from_name(name).ok_or_else(|| GenError::UnrecognizedType {
                    path: path.to_string(),
                    name: name.clone(),
                })?;
                Ok(map_builtin(builtin))
            }
            TypeRef::Named {
                namespace,
                name,
                args,
            } => {
                let id = TypeId::new(namespace.clone(), name.clone());
                let snapshot = self.snapshot;
                let desc = snapshot
                    .get(&id)
                    .ok_or_else(|| GenError::DanglingReference {
                        path: path.to_string(),
                        target: id.to_string(),
                    })?;
                if desc.generic_parameters.len() != args.len() {
                    return Err(GenError::GenericArity {
                        path: path.to_string(),
                        target: id.to_string(),
                        expected: desc.generic_parameters.len(),
                        found: args.len(),
                    });
                }
                let base = self.qualified_name(&id);
                self.enqueue(id);
                if args.is_empty() {
                    return Ok(TsType::Ref(base));
                }
                let args = args
                    .iter()
                    .map(|arg| self.map_ref(arg, path, generics))
                    .collect::<Result<Vec<_>>>()?;
                Ok(TsType::Generic { base, args })
            }
            TypeRef::GenericParam { name } => {
                if generics.iter().any(|g| g == name) {
                    Ok(TsType::Ref(sanitize_ts_identifier(name)))
                } else {
                    Err(GenError::UnrecognizedType {
                        path: path.to_string(),
                        name: format!("generic parameter {name} (not in scope)"),
                    })
                }
            }
            TypeRef::Array { element } => Ok(TsType::Array(Box::new(
                self.map_ref(element, path, generics)?,
            ))),
            TypeRef::Dictionary { key, value } => {
                let key = self.map_key(key, path, generics)?;
                let value = self.map_ref(value, path, generics)?;
                Ok(TsType::Record {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            TypeRef::Nullable { inner } => Ok(self.map_ref(inner, path, generics)?.or_null()),
        }
    }

    /// Dictionary keys: narrow numerics stay numbers, named enums keep their
    /// type, everything else is keyed by string.
    fn map_key(&mut self, key: &TypeRef, path: &str, generics: &[String]) -> Result<TsType> {
        let key = key.unwrap_nullable();
        let mapped = self.map_ref(key, path, generics)?;
        let keeps_type = match key {
            TypeRef::Builtin { name } => {
                Builtin::from_name(name).is_some_and(Builtin::is_narrow_numeric)
            }
            TypeRef::Named {
                namespace, name, ..
            } => self
                .snapshot
                .get(&TypeId::new(namespace.clone(), name.clone()))
                .is_some_and(TypeDescriptor::is_enum),
            _ => false,
        };
        Ok(if keeps_type { mapped } else { TsType::string() })
    }

    /// `Namespace_Client.Name`
    fn qualified_name(&self, id: &TypeId) -> String {
        format!(
            "{}.{}",
            client_namespace(&id.namespace, &self.options.namespace_suffix),
            sanitize_ts_identifier(&id.name)
        )
    }

    fn translate(&mut self, desc: &TypeDescriptor) -> Result<TsTypeDef> {
        let generics = &desc.generic_parameters;
        let type_params: Vec<String> = generics.iter().map(|g| sanitize_ts_identifier(g)).collect();

        let kind = if desc.is_enum() {
            TypeDefKind::Enum {
                members: desc
                    .members
                    .iter()
                    .map(|m| TsEnumMember {
                        name: m.name.clone(),
                        value: m.value,
                        doc: m.doc.clone(),
                    })
                    .collect(),
            }
        } else if let Some(element) = &desc.element {
            let path = format!("{}(element)", desc.name);
            TypeDefKind::TypeAlias {
                type_params,
                ty: TsType::Array(Box::new(self.map_ref(element, &path, generics)?)),
            }
        } else if desc.key.is_some() || desc.value.is_some() {
            let path = format!("{}(dictionary)", desc.name);
            let (Some(key), Some(value)) = (&desc.key, &desc.value) else {
                return Err(GenError::UnrecognizedType {
                    path,
                    name: "dictionary missing its key or value type".into(),
                });
            };
            let ty = self.map_ref(
                &TypeRef::Dictionary {
                    key: Box::new(key.clone()),
                    value: Box::new(value.clone()),
                },
                &path,
                generics,
            )?;
            TypeDefKind::TypeAlias { type_params, ty }
        } else {
            let extends = desc
                .base_type
                .as_ref()
                .map(|base| self.map_ref(base, &format!("{}(base)", desc.name), generics))
                .transpose()?;
            let owner = Owner::of(desc, &self.options.policies);
            let mut properties = Vec::new();
            for member in &desc.members {
                if let Some(prop) = self.translate_member(desc, member, owner)? {
                    properties.push(prop);
                }
            }
            TypeDefKind::Interface {
                type_params,
                extends,
                properties,
            }
        };

        Ok(TsTypeDef {
            name: sanitize_ts_identifier(&desc.name),
            kind,
            doc: desc.doc.clone(),
        })
    }

    fn translate_member(
        &mut self,
        owner_desc: &TypeDescriptor,
        member: &MemberDescriptor,
        owner: Owner,
    ) -> Result<Option<TsProp>> {
        let options = self.options;
        let strength = member_cherry_type(member, &options.policies, owner);
        if strength == PickStrength::None {
            return Ok(None);
        }

        let path = format!("{}.{}", owner_desc.name, member.name);
        let declared = member.ty.as_ref().ok_or_else(|| GenError::UnrecognizedType {
            path: path.clone(),
            name: "(missing member type)".into(),
        })?;
        let nullable = declared.is_nullable();
        let mut ty = self.map_ref(
            declared.unwrap_nullable(),
            &path,
            &owner_desc.generic_parameters,
        )?;

        let optional = strength == PickStrength::Cherry;
        if options.strict_nulls && (optional || nullable) {
            ty = ty.or_null();
        }

        let name = field_custom_name(member, &options.policies)
            .map(str::to_string)
            .or_else(|| member.custom_name.clone().filter(|n| !n.is_empty()))
            .unwrap_or_else(|| apply_case(&member.name, options.member_case));

        Ok(Some(TsProp {
            name,
            ty,
            optional,
            doc: member.doc.clone(),
        }))
    }
}

/// TypeScript type for a built-in backend shape.
fn map_builtin(builtin: Builtin) -> TsType {
    if builtin.is_narrow_numeric() {
        return TsType::number();
    }
    match builtin {
        Builtin::Bool => TsType::Primitive(TsPrimitive::Boolean),
        Builtin::DateTime | Builtin::DateTimeOffset => TsType::Ref("Date".into()),
        Builtin::Object => TsType::Primitive(TsPrimitive::Unknown),
        Builtin::Void => TsType::void(),
        Builtin::Stream | Builtin::HttpResponseMessage => TsType::Ref("Blob".into()),
        Builtin::ActionResult => TsType::Ref("Response".into()),
        // Wide integers travel as strings to survive JSON; byteArray is base64.
        _ => TsType::string(),
    }
}
