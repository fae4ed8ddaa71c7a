mod provider_map;

pub(crate) use provider_map::ProviderMap;
