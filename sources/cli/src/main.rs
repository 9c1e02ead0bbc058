use std::process::exit;

use anyhow::Result;
use args::Cli;
use clap::Parser;
use parse::config::HeapKind;
use parse::symbol::SymbolLocator;
use parse::{AotCache, DecodeError, DecodeOptions};
use tracing::{error, Level};
use tracing_subscriber::fmt;

mod args;

fn print_header(cache: &AotCache, base_archive: Option<&str>) {
    let generic = cache.generic();
    let config = cache.config();

    println!("Valid AOTCache file");
    println!("  magic: {:08x}", generic.magic);
    println!("  crc: {:08x}", generic.crc);
    println!("  version: {}", generic.version);
    println!("  header size: {}", generic.header_size);
    if let Some(name) = base_archive {
        println!("  base archive: {}", name);
    }

    println!("  jvm ident: {}", config.jvm_ident_trimmed());
    println!("  core region alignment: {:#x}", config.core_region_alignment);
    println!("  object alignment: {}", config.obj_alignment);
    println!(
        "  narrow oop: base {:#x}, shift {}, mode {}",
        config.narrow_oop_base, config.narrow_oop_shift, config.narrow_oop_mode
    );
    println!(
        "  narrow klass: {} bits, shift {}",
        config.narrow_klass_pointer_bits, config.narrow_klass_shift
    );
    println!("  compressed oops: {}", config.compressed_oops);
    println!(
        "  compressed class pointers: {}",
        config.compressed_class_pointers
    );
    println!("  compact strings: {}", config.compact_strings);
    println!("  compact headers: {}", config.compact_headers);
    println!("  object streaming mode: {}", config.object_streaming_mode);
    println!("  max heap size: {}", config.max_heap_size);
    println!(
        "  requested base address: {:#x}",
        config.requested_base_address
    );
    println!("  mapped base address: {:#x}", config.mapped_base_address);
    println!("  has aot linked classes: {}", config.has_aot_linked_classes);
    println!("  has full module graph: {}", config.has_full_module_graph);

    // Both views are printed, the file does not say which one applies
    for kind in [HeapKind::Mapped, HeapKind::Streamed] {
        println!("  heap header ({:?}): {:?}", kind, config.heap.view(kind));
    }
}

fn print_regions(cache: &AotCache) -> Result<()> {
    println!("Regions:");
    for data in cache.region_data()? {
        let region = &data.region;
        println!(
            "  {}: file offset {:#x}, mapping offset {:#x}, used {}, span {}",
            data.kind,
            region.file_offset,
            region.mapping_offset,
            region.used,
            data.bytes.len()
        );
    }

    Ok(())
}

fn print_symbols(cache: &AotCache, locator: &SymbolLocator) -> Result<()> {
    let matches = cache.symbols(locator)?;

    println!("Symbols ({}):", matches.len());
    for found in matches {
        println!(
            "  rw+{:#x} (file {:#x}) -> {:#x} (file {:#x}): {}",
            found.region_offset,
            found.file_offset,
            found.pointer,
            found.symbol.file_offset,
            found.name()
        );
    }

    Ok(())
}

fn run(args: &Cli) -> Result<()> {
    let mut options = DecodeOptions::default();
    if let Some(magic) = args.magic {
        options.magic = magic;
    }

    let cache = AotCache::open(&args.file, options)?;

    // The name can still be truncated, so nothing is printed until it is read
    let base_archive = cache.base_archive_name()?;
    print_header(&cache, base_archive.as_deref());

    if args.regions {
        print_regions(&cache)?;
    }

    if let (true, Some(pattern)) = (args.symbols, args.pattern) {
        print_symbols(&cache, &SymbolLocator::new(pattern))?;
    }

    Ok(())
}

fn main() {
    let args = Cli::parse();

    let format = fmt::format()
        .with_ansi(false)
        .without_time()
        .with_level(true)
        .with_target(false)
        .with_thread_names(false)
        .with_source_location(args.verbose > 1)
        .compact();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .event_format(format)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&args) {
        match err.downcast_ref::<DecodeError>() {
            Some(DecodeError::InvalidMagic { actual, .. }) => {
                println!(
                    "Invalid AOTCache file: magic number mismatch (actual: {:08x})",
                    actual
                );
            }
            Some(DecodeError::TruncatedInput(truncated)) => {
                error!("{}", truncated);
                println!("Invalid AOTCache file: file too short");
            }
            Some(DecodeError::Io(io)) => {
                eprintln!("Error reading file: {}", io);
            }
            None => {
                eprintln!("Error: {:#}", err);
            }
        }

        exit(1);
    }
}
