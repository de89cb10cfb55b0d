//! Istio mesh resource models
//!
//! Resource kinds managed by the console and their typed custom resources.

mod destinationrule;
mod gateway;
mod kind;
mod scaffold;
mod virtualservice;

pub use destinationrule::{DestinationRule, DestinationRuleSpec, Subset};
pub use gateway::{Gateway, GatewaySpec, Server, ServerPort};
pub use kind::{ResourceKind, ISTIO_API_GROUP, ISTIO_API_VERSION};
pub use scaffold::scaffold;
pub use virtualservice::{
    Destination, HttpRoute, HttpRouteDestination, PortSelector, VirtualService,
    VirtualServiceSpec,
};
