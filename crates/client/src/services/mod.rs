//! Per-resource services sharing one [`ApiClient`].
//!
//! Every service is a thin typed wrapper over the shared client, so all of
//! them see the same cookie jar, session state and interceptor.

mod resource;

pub use resource::ResourceService;

use crate::client::ApiClient;
use crate::models::{Campaign, Labor, Member, Plot};

pub type CampaignService = ResourceService<Campaign>;
pub type LaborService = ResourceService<Labor>;
pub type PlotService = ResourceService<Plot>;
pub type MemberService = ResourceService<Member>;

/// All resource services, built from one client.
#[derive(Debug, Clone)]
pub struct Services {
    pub campaigns: CampaignService,
    pub labors: LaborService,
    pub plots: PlotService,
    pub members: MemberService,
}

impl Services {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            campaigns: ResourceService::new(client.clone()),
            labors: ResourceService::new(client.clone()),
            plots: ResourceService::new(client.clone()),
            members: ResourceService::new(client.clone()),
        }
    }
}
