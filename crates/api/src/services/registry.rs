//! Lookup of model services by the service name recorded on commands.

use crate::services::model::ModelService;
use crate::services::ontology::OntologyService;
use crate::services::project::ProjectService;
use crate::services::property::PropertyService;

/// Every service whose commands can be replayed.
static SERVICES: &[&(dyn ModelService + 'static)] =
    &[&ProjectService, &OntologyService, &PropertyService];

/// The service named `name` (e.g. `ProjectService`).
pub fn service_for(name: &str) -> Option<&'static dyn ModelService> {
    SERVICES.iter().copied().find(|s| s.service_name() == name)
}
