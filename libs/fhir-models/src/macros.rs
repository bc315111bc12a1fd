//! Capability impls shared by every concrete type of a given shape
//!
//! Only the boilerplate that is identical across types lives here; field
//! lists, visiting order and validation stay with each type.

/// Plain datatype: `Element` on the type, `ElementBuilder` on its builder.
macro_rules! element_type {
    ($ty:ident, $builder:ident, $name:literal) => {
        impl ferrum_core::FhirType for $ty {
            const TYPE_NAME: &'static str = $name;
        }

        impl ferrum_core::Element for $ty {
            fn element(&self) -> &ferrum_core::node::ElementBase {
                &self.element
            }
        }

        impl ferrum_core::ElementBuilder for $builder {
            fn element_stage(&mut self) -> &mut ferrum_core::node::ElementStage {
                &mut self.element
            }
        }
    };
}

/// Backbone element nested in a resource; `$name` is its path.
macro_rules! backbone_type {
    ($ty:ident, $builder:ident, $name:literal) => {
        impl ferrum_core::FhirType for $ty {
            const TYPE_NAME: &'static str = $name;
        }

        impl ferrum_core::Element for $ty {
            fn element(&self) -> &ferrum_core::node::ElementBase {
                self.backbone.element()
            }
        }

        impl ferrum_core::BackboneElement for $ty {
            fn backbone(&self) -> &ferrum_core::node::BackboneElementBase {
                &self.backbone
            }
        }

        impl ferrum_core::ElementBuilder for $builder {
            fn element_stage(&mut self) -> &mut ferrum_core::node::ElementStage {
                self.backbone.element_mut()
            }
        }

        impl ferrum_core::BackboneElementBuilder for $builder {
            fn backbone_stage(&mut self) -> &mut ferrum_core::node::BackboneStage {
                &mut self.backbone
            }
        }
    };
}

/// Domain resource: `Resource` + `DomainResource` on the type and the
/// matching builder traits, with [`AnyResource`](crate::AnyResource) as the
/// contained union.
macro_rules! domain_resource_type {
    ($ty:ident, $builder:ident, $name:literal) => {
        impl ferrum_core::FhirType for $ty {
            const TYPE_NAME: &'static str = $name;
        }

        impl ferrum_core::Resource for $ty {
            fn resource(&self) -> &ferrum_core::node::ResourceBase {
                self.domain.resource()
            }
        }

        impl ferrum_core::DomainResource for $ty {
            type Contained = crate::AnyResource;

            fn domain(&self) -> &ferrum_core::node::DomainResourceBase<crate::AnyResource> {
                &self.domain
            }
        }

        impl ferrum_core::ResourceBuilder for $builder {
            fn resource_stage(&mut self) -> &mut ferrum_core::node::ResourceStage {
                self.domain.resource_mut()
            }
        }

        impl ferrum_core::DomainResourceBuilder for $builder {
            type Contained = crate::AnyResource;

            fn domain_stage(
                &mut self,
            ) -> &mut ferrum_core::node::DomainResourceStage<crate::AnyResource> {
                &mut self.domain
            }
        }

        impl From<$ty> for crate::AnyResource {
            fn from(resource: $ty) -> Self {
                crate::AnyResource::$ty(resource)
            }
        }

        impl ferrum_core::IntoField<crate::AnyResource> for $ty {
            fn into_field(self) -> ferrum_core::Staged<crate::AnyResource> {
                Some(Ok(crate::AnyResource::$ty(self)))
            }
        }
    };
}
