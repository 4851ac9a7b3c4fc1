//! Registry of sort mapping tables keyed by (resource, entity) type pair

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use super::property::{PropertyMapping, SortTerm};
use super::MappingError;

/// Process-wide set of sort mapping tables
///
/// Built once at startup with [`PropertyMappingRegistry::builder`] and
/// read-only afterwards, so it can be shared behind an `Arc` without locking.
///
/// # Example
///
/// ```rust
/// use library_api::mapping::{PropertyMapping, PropertyMappingRegistry};
///
/// struct PersonDto;
/// struct Person;
///
/// let registry = PropertyMappingRegistry::builder()
///     .register::<PersonDto, Person>(PropertyMapping::new().map("name", [("name", false)]))
///     .unwrap()
///     .build();
///
/// assert!(registry.is_valid_sort::<PersonDto, Person>("name desc").unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyMappingRegistry {
    tables: HashMap<(TypeId, TypeId), PropertyMapping>,
}

/// Builder for [`PropertyMappingRegistry`]
#[derive(Debug, Default)]
pub struct PropertyMappingRegistryBuilder {
    tables: HashMap<(TypeId, TypeId), PropertyMapping>,
}

impl PropertyMappingRegistryBuilder {
    /// Register the table for `Source` (client resource) to `Target` (entity)
    ///
    /// Fails if the table breaks its invariants or the pair is already
    /// registered.
    pub fn register<Source: 'static, Target: 'static>(
        mut self,
        mapping: PropertyMapping,
    ) -> Result<Self, MappingError> {
        mapping.validate()?;

        let key = (TypeId::of::<Source>(), TypeId::of::<Target>());
        if self.tables.contains_key(&key) {
            return Err(MappingError::AlreadyRegistered {
                source_type: type_name::<Source>(),
                target_type: type_name::<Target>(),
            });
        }

        tracing::debug!(
            source_type = type_name::<Source>(),
            target_type = type_name::<Target>(),
            keys = mapping.mappings().len(),
            "Registered sort mapping"
        );
        self.tables.insert(key, mapping);
        Ok(self)
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> PropertyMappingRegistry {
        PropertyMappingRegistry {
            tables: self.tables,
        }
    }
}

impl PropertyMappingRegistry {
    /// Start building a registry
    #[must_use]
    pub fn builder() -> PropertyMappingRegistryBuilder {
        PropertyMappingRegistryBuilder::default()
    }

    /// Get the table registered for `Source` to `Target`
    pub fn resolve<Source: 'static, Target: 'static>(
        &self,
    ) -> Result<&PropertyMapping, MappingError> {
        self.tables
            .get(&(TypeId::of::<Source>(), TypeId::of::<Target>()))
            .ok_or(MappingError::NotRegistered {
                source_type: type_name::<Source>(),
                target_type: type_name::<Target>(),
            })
    }

    /// Whether `order_by` is a valid sort for the pair
    ///
    /// `Ok(false)` is a client error; `Err` means the pair was never
    /// registered.
    pub fn is_valid_sort<Source: 'static, Target: 'static>(
        &self,
        order_by: &str,
    ) -> Result<bool, MappingError> {
        Ok(self.resolve::<Source, Target>()?.is_valid_sort(order_by))
    }

    /// Translate `order_by` into store sort terms for the pair
    ///
    /// Yields `Ok(None)` for a sort string that [`is_valid_sort`](Self::is_valid_sort)
    /// would reject.
    pub fn translate_sort<Source: 'static, Target: 'static>(
        &self,
        order_by: &str,
    ) -> Result<Option<Vec<SortTerm>>, MappingError> {
        Ok(self.resolve::<Source, Target>()?.translate_sort(order_by))
    }
}
