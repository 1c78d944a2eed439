//! Entitlement Merkle CLI
//!
//! Computes whitelist roots, hands out claim proofs and checks them.
//! All commitment logic lives in the library; this binary only moves files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use entitlement_merkle::{
    format_digest, load_whitelist, pack, parse_digest, unpack, Address, ClaimBundle,
    ClaimVerifier, EntitlementKinds, EntitlementSet, HashAlgorithm, LeafEncoding,
    PackedEntitlement, RootVerifier, TreeConfig, WhitelistTree, VERSION,
};

#[derive(Parser, Debug)]
#[command(name = "entitlement-merkle")]
#[command(about = "Merkle commitments over entitlement whitelists", long_about = None)]
#[command(version)]
struct Cli {
    /// Hash function (overrides WHITELIST_HASH)
    #[arg(long, global = true)]
    hash: Option<HashAlgorithm>,

    /// Leaf layout: packed | expanded (overrides WHITELIST_LEAF_ENCODING)
    #[arg(long, global = true)]
    leaf_encoding: Option<LeafEncoding>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the Merkle root of a whitelist file
    Root(WhitelistArgs),
    /// Generate a claim bundle for an address
    Proof {
        #[command(flatten)]
        whitelist: WhitelistArgs,
        /// Address to prove
        #[arg(short, long)]
        address: String,
        /// Write the bundle here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Verify a claim bundle against a trusted root
    Verify {
        /// Claim bundle JSON file
        #[arg(short, long)]
        bundle: PathBuf,
        /// Trusted root (hex)
        #[arg(short, long)]
        root: String,
        /// Committed leaf count; enables the proof length check
        #[arg(long)]
        leaf_count: Option<usize>,
    },
    /// List the entitlement kinds an address may claim
    Claimable {
        #[command(flatten)]
        whitelist: WhitelistArgs,
        /// Address to look up
        #[arg(short, long)]
        address: String,
    },
    /// Pack entitlement IDs into a bitmask
    Pack {
        /// Entitlement IDs
        ids: Vec<u16>,
    },
    /// Unpack a bitmask into entitlement IDs
    Unpack {
        /// Packed bitmask (hex)
        value: String,
    },
}

#[derive(Args, Debug)]
struct WhitelistArgs {
    /// Whitelist JSON file
    #[arg(short, long)]
    whitelist: PathBuf,
    /// Entitlement kind registry JSON file (defaults to the built-in kinds)
    #[arg(short, long)]
    kinds: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = TreeConfig::from_env();
    if let Some(hash) = cli.hash {
        config = config.with_hash(hash);
    }
    if let Some(encoding) = cli.leaf_encoding {
        config = config.with_leaf_encoding(encoding);
    }

    info!("Entitlement Merkle v{}", VERSION);
    info!("Hash: {}, leaf encoding: {}", config.hash, config.leaf_encoding);

    match cli.command {
        Commands::Root(args) => run_root(config, &args),
        Commands::Proof {
            whitelist,
            address,
            output,
        } => run_proof(config, &whitelist, &address, output.as_deref()),
        Commands::Verify {
            bundle,
            root,
            leaf_count,
        } => run_verify(config, &bundle, &root, leaf_count),
        Commands::Claimable { whitelist, address } => run_claimable(config, &whitelist, &address),
        Commands::Pack { ids } => run_pack(ids),
        Commands::Unpack { value } => run_unpack(&value),
    }
}

fn load_kinds(path: Option<&Path>) -> Result<EntitlementKinds> {
    match path {
        Some(path) => EntitlementKinds::load(path)
            .with_context(|| format!("Failed to load kinds from {}", path.display())),
        None => Ok(EntitlementKinds::default()),
    }
}

fn build_tree(config: TreeConfig, args: &WhitelistArgs) -> Result<(WhitelistTree, EntitlementKinds)> {
    let kinds = load_kinds(args.kinds.as_deref())?;
    let whitelist = load_whitelist(&args.whitelist, &kinds)
        .with_context(|| format!("Failed to load whitelist {}", args.whitelist.display()))?;
    let tree = WhitelistTree::build(config, whitelist).context("Failed to build Merkle tree")?;
    Ok((tree, kinds))
}

fn run_root(config: TreeConfig, args: &WhitelistArgs) -> Result<()> {
    let (tree, _) = build_tree(config, args)?;

    println!("Merkle root: {}", format_digest(&tree.root()));
    println!("Leaves: {}", tree.tree().leaf_count());
    println!("Depth: {}", tree.tree().depth());
    Ok(())
}

fn run_proof(config: TreeConfig, args: &WhitelistArgs, address: &str, output: Option<&Path>) -> Result<()> {
    let (tree, _) = build_tree(config, args)?;
    let address = Address::parse(address)?;
    let bundle = tree.claim_bundle(&address)?;
    let json = serde_json::to_string_pretty(&bundle).context("Failed to encode claim bundle")?;

    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote claim bundle for {} to {}", address, path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_verify(config: TreeConfig, bundle_path: &Path, root: &str, leaf_count: Option<usize>) -> Result<()> {
    let json = std::fs::read_to_string(bundle_path)
        .with_context(|| format!("Failed to read {}", bundle_path.display()))?;
    let bundle: ClaimBundle = serde_json::from_str(&json).context("Invalid claim bundle")?;
    let trusted_root = parse_digest(root)?;

    if bundle.root != trusted_root {
        warn!(
            "Bundle was generated against {}, verifying against {}",
            format_digest(&bundle.root),
            format_digest(&trusted_root)
        );
    }

    let verifier = match leaf_count {
        Some(count) => {
            RootVerifier::new(config.with_strict_proofs(true), trusted_root).with_leaf_count(count)
        }
        None => RootVerifier::new(config, trusted_root),
    };

    if verifier.verify_claim(&bundle.address, bundle.entitlement, &bundle.proof)? {
        println!("valid");
        Ok(())
    } else {
        println!("invalid");
        bail!("claim for {} does not match root {}", bundle.address, format_digest(&trusted_root));
    }
}

fn run_claimable(config: TreeConfig, args: &WhitelistArgs, address: &str) -> Result<()> {
    let (tree, kinds) = build_tree(config, args)?;
    let address = Address::parse(address)?;

    let Some(entitlement) = tree.claimable(&address) else {
        bail!("No whitelist entry found for address {}", address);
    };

    println!("Entitlement: {}", entitlement);
    println!("Claimable kinds: {:?}", kinds.names_of(entitlement));
    Ok(())
}

fn run_pack(ids: Vec<u16>) -> Result<()> {
    let set: EntitlementSet = ids.into_iter().collect();
    println!("{}", pack(&set)?);
    Ok(())
}

fn run_unpack(value: &str) -> Result<()> {
    let packed = PackedEntitlement::parse_hex(value)?;
    let ids: Vec<String> = unpack(packed).iter().map(|id| id.to_string()).collect();
    println!("[{}]", ids.join(", "));
    Ok(())
}
