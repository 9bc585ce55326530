use gni_model::models::HostnameCache;
use gni_model::output::{log_model, print_summary, write_snapshot};
use gni_model::query::{find_self_cluster, find_self_node, StaticLocalAddresses};
use gni_model::{Config, ModelSlot, ParseContext};
use log4rs;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default())?;
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let config = Config::from_env()?;
    let ctx = ParseContext::new();
    let text = ctx.read_file(&config.xml_path)?;

    let slot = ModelSlot::with_hostnames(HostnameCache::new(config.hostnames.clone()));
    let model = slot.refresh(&ctx, &text, config.populate_mode)?;
    log_model(&model);

    let local = StaticLocalAddresses::new(&config.local_addrs);
    match find_self_cluster(&model, &local) {
        Some(cluster) => log::info!("this host belongs to cluster {}", cluster.name),
        None => log::warn!("this host is not part of any cluster in the document"),
    }
    if let Some(node) = find_self_node(&model, &local) {
        log::info!("this host is node {}", node.name);
    }

    print_summary(&model);

    if let Some(dir) = config.snapshot_dir.as_deref() {
        write_snapshot(&model, dir)?;
    }

    log::info!("#End main()");
    Ok(())
}
