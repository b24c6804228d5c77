//! Satchel Headless Inventory Harness
//!
//! Validates the inventory engine, its data files, and a seeded random sweep
//! of drag-and-drop sessions. Runs entirely in-process, no UI and no saves.
//!
//! Usage:
//!   cargo run -p satchel-simtest
//!   cargo run -p satchel-simtest -- --verbose --seed 7
//!   cargo run -p satchel-simtest -- --config data/inventory_config.json

use std::path::{Path, PathBuf};

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use satchel_logic::arrange::{find_arrangement, Arrangement};
use satchel_logic::catalog::ItemCatalog;
use satchel_logic::config::{validate_config, InventoryConfig};
use satchel_logic::grid::{GridLayout, OccupancyGrid, Zone};
use satchel_logic::inventory::{DropOutcome, Inventory, InventoryError};
use satchel_logic::item::{Item, ItemCategory, ItemId};
use satchel_logic::placement::{can_place, classify_placement, PlacementCheck};
use satchel_logic::shape::{Rotation, Shape};
use serde::Deserialize;

// ── Data files (same JSON the game ships) ───────────────────────────────
const CATALOG_JSON: &str = include_str!("../../../data/item_catalog.json");
const SCENARIOS_JSON: &str = include_str!("../../../data/scenarios.json");

const DEFAULT_SEED: u64 = 0x5a7c_4e11;
const SWEEP_ROUNDS: u32 = 250;

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    scenarios: Vec<Scenario>,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    layout: GridLayout,
    #[serde(default)]
    items: Vec<ScenarioItem>,
    dragged: ScenarioItem,
    drop: (i32, i32),
    expect: Expected,
}

#[derive(Debug, Deserialize)]
struct ScenarioItem {
    id: u32,
    shape: Shape,
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
    #[serde(default)]
    rotation: Rotation,
}

impl ScenarioItem {
    fn to_item(&self) -> Item {
        Item::new(
            ItemId(self.id),
            format!("item-{}", self.id),
            ItemCategory::Loot,
            self.shape.clone(),
        )
        .placed(self.x, self.y, self.rotation)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Expected {
    NotApplicable,
    NoArrangement,
    Relocated { moves: Vec<Move> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
struct Move {
    id: u32,
    x: i32,
    y: i32,
    #[serde(default)]
    rotation: Rotation,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Parser)]
#[command(name = "satchel-simtest")]
#[command(about = "Headless validation of the Satchel inventory engine", long_about = None)]
struct Cli {
    /// Print every result and raise logging to debug
    #[arg(long)]
    verbose: bool,

    /// Seed for the randomized sweep
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Grid layouts as JSON; defaults to the built-in layouts
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn load_config(path: Option<&Path>) -> Result<InventoryConfig, String> {
    let Some(path) = path else {
        return Ok(InventoryConfig::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    InventoryConfig::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose);
    let verbose = args.verbose;
    println!("=== Satchel Inventory Harness ===\n");

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: could not load config: {e}");
            std::process::exit(2);
        }
    };

    let mut results = Vec::new();

    // 1. Grid configuration
    results.extend(validate_configuration(&config, verbose));
    if results.iter().any(|r| !r.passed) {
        report(&results, verbose);
    }

    // 2. Shape rotation
    results.extend(validate_shapes(verbose));

    // 3. Occupancy grid
    results.extend(validate_grid(&config, verbose));

    // 4. Placement rules
    results.extend(validate_placement(&config, verbose));

    // 5. Arrangement scenarios
    results.extend(validate_scenarios(verbose));

    // 6. Item catalog
    results.extend(validate_catalog(&config, verbose));

    // 7. Session flow
    results.extend(validate_session(&config, verbose));

    // 8. Randomized sweep
    results.extend(validate_random_sweep(&config, args.seed, verbose));

    report(&results, verbose);
}

/// Print the summary and exit; non-zero if anything failed.
fn report(results: &[TestResult], verbose: bool) -> ! {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    std::process::exit(if failed > 0 { 1 } else { 0 });
}

fn describe_layout(layout: &GridLayout) -> String {
    if layout.zoning.is_zoned() {
        format!("{}x{} {:?}", layout.width, layout.height, layout.zoning)
    } else {
        format!("{}x{}", layout.width, layout.height)
    }
}

fn equipment_rows(layout: &GridLayout) -> i32 {
    (0..layout.height as i32)
        .take_while(|&y| layout.zoning.zone_of_row(y) == Some(Zone::Equipment))
        .count() as i32
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_configuration(config: &InventoryConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Grid Configuration ---");
    let mut results = Vec::new();

    let errors = validate_config(config);
    results.push(TestResult {
        name: "config_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "player, loot crate and warehouse layouts accepted".into()
        } else {
            format!("{} problems: {:?}", errors.len(), errors)
        },
    });

    if verbose {
        println!("  player:     {}", describe_layout(&config.player));
        println!("  loot crate: {}", describe_layout(&config.loot_crate));
        println!("  warehouse:  {}", describe_layout(&config.warehouse));
    }

    results
}

// ── 2. Shapes ───────────────────────────────────────────────────────────

fn validate_shapes(_verbose: bool) -> Vec<TestResult> {
    println!("--- Shape Rotation ---");
    let mut results = Vec::new();

    let shape = match Shape::from_rows(vec![vec![1, 1, 1], vec![1, 0, 0]]) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "shape_build".into(),
                passed: false,
                detail: format!("could not build L shape: {e}"),
            });
            return results;
        }
    };

    // 1 1 1      1 1
    // 1 0 0  ->  0 1
    //            0 1
    let turned = shape.rotate_clockwise();
    let expected = vec![vec![1, 1], vec![0, 1], vec![0, 1]];
    results.push(TestResult {
        name: "shape_quarter_turn".into(),
        passed: turned.to_rows() == expected,
        detail: format!("{:?} -> {:?}", shape.to_rows(), turned.to_rows()),
    });

    let full_turn = (0..4).fold(shape.clone(), |s, _| s.rotate_clockwise());
    results.push(TestResult {
        name: "shape_four_turns_identity".into(),
        passed: full_turn == shape,
        detail: "four clockwise turns reproduce the shape".into(),
    });

    let counts: Vec<usize> = Rotation::ALL
        .iter()
        .map(|&r| shape.rotated(r).cell_count())
        .collect();
    results.push(TestResult {
        name: "shape_rotation_keeps_cells".into(),
        passed: counts.iter().all(|&c| c == shape.cell_count()),
        detail: format!("cell counts per rotation: {:?}", counts),
    });

    let cycle_ok = Rotation::ALL
        .iter()
        .all(|&r| Rotation::from_degrees(r.degrees()) == Some(r) && r.next().next().next().next() == r);
    results.push(TestResult {
        name: "shape_rotation_cycle".into(),
        passed: cycle_ok,
        detail: "0/90/180/270 round-trip through degrees and cycle in four steps".into(),
    });

    let rejects = [
        Shape::from_rows(vec![]).is_err(),
        Shape::from_rows(vec![vec![1, 1], vec![1]]).is_err(),
        Shape::from_rows(vec![vec![2]]).is_err(),
        Shape::from_rows(vec![vec![0, 0]]).is_err(),
    ];
    results.push(TestResult {
        name: "shape_rejects_malformed".into(),
        passed: rejects.iter().all(|&r| r),
        detail: format!("empty/ragged/non-binary/all-zero rejected: {:?}", rejects),
    });

    results
}

// ── 3. Occupancy Grid ───────────────────────────────────────────────────

fn validate_grid(config: &InventoryConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Occupancy Grid ---");
    let mut results = Vec::new();

    let layout = config.warehouse;
    let empty = OccupancyGrid::with_layout(layout);
    results.push(TestResult {
        name: "grid_starts_empty".into(),
        passed: empty.free_cell_count() == layout.area(),
        detail: format!("{} free of {} cells", empty.free_cell_count(), layout.area()),
    });

    let Ok(square) = Shape::rectangle(2, 2) else {
        results.push(TestResult {
            name: "grid_build".into(),
            passed: false,
            detail: "could not build a 2x2 shape".into(),
        });
        return results;
    };
    let block = Item::new(ItemId(1), "block", ItemCategory::Loot, square);
    let written = empty.write_item(&block, 1, 1);
    let owned = written.footprint_of(block.id);
    results.push(TestResult {
        name: "grid_write_marks_footprint".into(),
        passed: owned == vec![(1, 1), (2, 1), (1, 2), (2, 2)],
        detail: format!("2x2 at (1,1) owns {:?}", owned),
    });

    results.push(TestResult {
        name: "grid_write_is_copy".into(),
        passed: empty.free_cell_count() == layout.area(),
        detail: "writing returns a new grid; the source stays empty".into(),
    });

    results.push(TestResult {
        name: "grid_clear_restores".into(),
        passed: written.clear_item(block.id) == empty,
        detail: "write then clear is cell-for-cell identical".into(),
    });

    let edge = empty.write_item(&block, layout.width as i32 - 1, 0);
    results.push(TestResult {
        name: "grid_write_skips_out_of_bounds".into(),
        passed: edge.footprint_of(block.id).len() == 2,
        detail: format!(
            "overhanging write kept {} in-bounds cells",
            edge.footprint_of(block.id).len()
        ),
    });

    if verbose {
        let player = OccupancyGrid::with_layout(config.player).write_item(&block, 0, 0);
        println!("  player grid with a 2x2 in the corner:");
        for line in player.render().lines() {
            println!("    {line}");
        }
    }

    results
}

// ── 4. Placement ────────────────────────────────────────────────────────

fn validate_placement(config: &InventoryConfig, _verbose: bool) -> Vec<TestResult> {
    println!("--- Placement Rules ---");
    let mut results = Vec::new();

    let layout = config.player;
    let grid = OccupancyGrid::with_layout(layout);
    let Ok(column) = Shape::rectangle(1, 2) else {
        results.push(TestResult {
            name: "placement_build".into(),
            passed: false,
            detail: "could not build a 1x2 shape".into(),
        });
        return results;
    };
    let bar = Item::new(ItemId(1), "bar", ItemCategory::Artifact, column);
    let band = equipment_rows(&layout);

    let off_right = layout.width as i32;
    results.push(TestResult {
        name: "placement_rejects_out_of_bounds".into(),
        passed: !can_place(&grid, &bar, off_right, 0, Rotation::Deg0)
            && !can_place(&grid, &bar, 0, -1, Rotation::Deg0)
            && classify_placement(&grid, &bar, 0, layout.height as i32 - 1, Rotation::Deg0)
                == PlacementCheck::OutOfBounds,
        detail: "anchors past any edge rejected".into(),
    });

    // Vertical bar with its top cell on the last equipment row.
    let straddle = band - 1;
    results.push(TestResult {
        name: "placement_rejects_zone_straddle".into(),
        passed: classify_placement(&grid, &bar, 0, straddle, Rotation::Deg0)
            == PlacementCheck::CrossesZone,
        detail: format!("1x2 at row {} crosses into the backpack", straddle),
    });

    results.push(TestResult {
        name: "placement_turned_bar_fits_band".into(),
        passed: can_place(&grid, &bar, 0, straddle, Rotation::Deg90),
        detail: "the same bar lying flat stays inside the equipment band".into(),
    });

    let other = Item::new(ItemId(2), "gem", ItemCategory::Loot, Shape::single());
    let occupied = grid.write_item(&other, 0, band + 1);
    let check = classify_placement(&occupied, &bar, 0, band, Rotation::Deg0);
    results.push(TestResult {
        name: "placement_reports_collisions".into(),
        passed: check == PlacementCheck::Collides(vec![other.id]),
        detail: format!("{:?}", check),
    });

    let moved = occupied.write_item(&bar, 2, band);
    results.push(TestResult {
        name: "placement_ignores_own_cells".into(),
        passed: can_place(&moved, &bar, 2, band + 1, Rotation::Deg0),
        detail: "an item may overlap its own previous footprint".into(),
    });

    results
}

// ── 5. Arrangement Scenarios ────────────────────────────────────────────

fn validate_scenarios(verbose: bool) -> Vec<TestResult> {
    println!("--- Arrangement Scenarios ---");
    let mut results = Vec::new();

    let file: ScenarioFile = match serde_json::from_str(SCENARIOS_JSON) {
        Ok(f) => f,
        Err(e) => {
            results.push(TestResult {
                name: "scenarios_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    for scenario in &file.scenarios {
        let items: Vec<Item> = scenario.items.iter().map(ScenarioItem::to_item).collect();
        let dragged = scenario.dragged.to_item();
        let (x, y) = scenario.drop;
        let snapshot = (items.clone(), dragged.clone());

        let got = find_arrangement(&items, &dragged, x, y, &scenario.layout);
        let matches = match (&scenario.expect, &got) {
            (Expected::NotApplicable, Arrangement::NotApplicable) => true,
            (Expected::NoArrangement, Arrangement::NoArrangement) => true,
            (Expected::Relocated { moves }, Arrangement::Relocated(moved)) => {
                let actual: Vec<Move> = moved
                    .iter()
                    .map(|m| Move {
                        id: m.id.0,
                        x: m.x,
                        y: m.y,
                        rotation: m.rotation,
                    })
                    .collect();
                &actual == moves
            }
            _ => false,
        };
        let untouched = (items, dragged) == snapshot;

        results.push(TestResult {
            name: format!("scenario_{}", scenario.name),
            passed: matches && untouched,
            detail: format!("expected {:?}, got {:?}", scenario.expect, got),
        });
    }

    if verbose {
        println!("  {} scenarios loaded", file.scenarios.len());
    }

    results
}

// ── 6. Item Catalog ─────────────────────────────────────────────────────

fn validate_catalog(config: &InventoryConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Item Catalog ---");
    let mut results = Vec::new();

    let catalog = match ItemCatalog::from_json(CATALOG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_parse".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "catalog_not_empty".into(),
        passed: catalog.len() >= 10,
        detail: format!("{} item definitions loaded", catalog.len()),
    });

    let mut by_category = [0usize; 3];
    let mut hidden_ok = true;
    let mut fits_warehouse = Inventory::new(config.warehouse);
    let mut unstowed = Vec::new();
    for (n, key) in catalog.keys().enumerate() {
        let item = match catalog.instantiate(key, ItemId(n as u32 + 1)) {
            Ok(item) => item,
            Err(e) => {
                results.push(TestResult {
                    name: format!("catalog_instantiate_{key}"),
                    passed: false,
                    detail: e.to_string(),
                });
                continue;
            }
        };
        by_category[match item.category {
            ItemCategory::Artifact => 0,
            ItemCategory::Consumable => 1,
            ItemCategory::Loot => 2,
        }] += 1;

        if !item.revealed {
            let display = item.display_shape();
            hidden_ok &= display.cell_count() == display.width() * display.height()
                && display.width() == item.shape.width()
                && display.height() == item.shape.height();
        }

        if fits_warehouse.stow(item).is_err() {
            unstowed.push(key.to_string());
        }
    }

    results.push(TestResult {
        name: "catalog_all_categories".into(),
        passed: by_category.iter().all(|&c| c > 0),
        detail: format!(
            "artifact={} consumable={} loot={}",
            by_category[0], by_category[1], by_category[2]
        ),
    });

    results.push(TestResult {
        name: "catalog_unidentified_show_box".into(),
        passed: hidden_ok,
        detail: "unrevealed items display their full bounding box".into(),
    });

    results.push(TestResult {
        name: "catalog_fits_warehouse".into(),
        passed: unstowed.is_empty() && fits_warehouse.check_consistency().is_empty(),
        detail: if unstowed.is_empty() {
            format!("{} items stowed side by side", fits_warehouse.len())
        } else {
            format!("no room for: {}", unstowed.join(", "))
        },
    });

    if verbose {
        println!("  warehouse after stowing the catalog:");
        for line in fits_warehouse.grid().render().lines() {
            println!("    {line}");
        }
    }

    results
}

// ── 7. Session Flow ─────────────────────────────────────────────────────

fn validate_session(config: &InventoryConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Session Flow ---");
    let mut results = Vec::new();

    let catalog = match ItemCatalog::from_json(CATALOG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "session_catalog".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    let spawn = |key: &str, id: u32| catalog.instantiate(key, ItemId(id));
    let (idol, tome, charm) = match (
        spawn("strange_idol", 1),
        spawn("sealed_tome", 2),
        spawn("bone_charm", 3),
    ) {
        (Ok(a), Ok(b), Ok(c)) => (a, b, c),
        _ => {
            results.push(TestResult {
                name: "session_spawn".into(),
                passed: false,
                detail: "catalog is missing strange_idol, sealed_tome or bone_charm".into(),
            });
            return results;
        }
    };

    let band = equipment_rows(&config.player);
    let mut loot = Inventory::new(config.loot_crate);
    let mut player = Inventory::new(config.player);

    // Loot drops into the crate unidentified.
    let stowed = loot.stow(idol.clone());
    results.push(TestResult {
        name: "session_stow_loot".into(),
        passed: stowed.is_ok() && loot.contains(idol.id),
        detail: format!("idol stowed at {:?}", stowed),
    });

    // Crate -> backpack.
    let moved = Inventory::transfer(&mut loot, &mut player, idol.id, 0, band, Rotation::Deg0);
    results.push(TestResult {
        name: "session_transfer".into(),
        passed: moved == Ok(DropOutcome::Placed) && !loot.contains(idol.id) && player.contains(idol.id),
        detail: format!("crate -> backpack at (0, {}): {:?}", band, moved),
    });

    let identified = player.identify(idol.id);
    results.push(TestResult {
        name: "session_identify".into(),
        passed: identified.is_ok() && player.get(idol.id).is_some_and(|i| i.revealed),
        detail: "idol revealed after identification".into(),
    });

    // Equip a charm in the top-left corner.
    let equipped = player.drop_item(charm.clone(), 0, 0, Rotation::Deg0);
    let in_band: Vec<ItemId> = player.equipped_items().map(|i| i.id).collect();
    results.push(TestResult {
        name: "session_equip".into(),
        passed: equipped.is_ok() && in_band == vec![charm.id],
        detail: format!("equipped: {:?}", in_band),
    });

    // Drop a tome on the idol; the idol gets shoved aside.
    let shove = player.drop_item(tome.clone(), 0, band, Rotation::Deg0);
    let shoved_ok = match &shove {
        Ok(DropOutcome::Rearranged { moved }) => moved.iter().map(|m| m.id).eq([idol.id]),
        _ => false,
    };
    results.push(TestResult {
        name: "session_rearrange".into(),
        passed: shoved_ok
            && player.get(tome.id).map(|t| (t.x, t.y)) == Some((0, band))
            && player.get(charm.id).map(|c| (c.x, c.y)) == Some((0, 0)),
        detail: format!("{:?}", shove),
    });

    // Half in the band, half in the backpack.
    let snapshot = player.clone();
    let straddle = player.drop_item(tome.clone(), 0, band - 1, Rotation::Deg0);
    results.push(TestResult {
        name: "session_reject_leaves_state".into(),
        passed: straddle == Err(InventoryError::CrossesZone { x: 0, y: band - 1 })
            && player == snapshot,
        detail: format!("{:?}", straddle),
    });

    let spun = player.rotate_item(tome.id);
    results.push(TestResult {
        name: "session_rotate".into(),
        passed: spun.is_ok() && player.get(tome.id).map(|t| t.rotation) == Some(Rotation::Deg90),
        detail: format!("{:?}", spun),
    });

    // Consuming removes the item outright.
    let consumed = player.remove_item(charm.id);
    results.push(TestResult {
        name: "session_consume".into(),
        passed: consumed.is_some() && !player.equipped_items().any(|i| i.id == charm.id),
        detail: "charm consumed and no longer equipped".into(),
    });

    let problems = player.check_consistency();
    results.push(TestResult {
        name: "session_consistent".into(),
        passed: problems.is_empty() && loot.check_consistency().is_empty(),
        detail: format!("{} items in backpack, problems: {:?}", player.len(), problems),
    });

    if verbose {
        for line in player.grid().render().lines() {
            println!("    {line}");
        }
    }

    results
}

// ── 8. Randomized Sweep ─────────────────────────────────────────────────

fn validate_random_sweep(config: &InventoryConfig, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Randomized Sweep (seed {seed}) ---");
    let mut results = Vec::new();

    let catalog = match ItemCatalog::from_json(CATALOG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "sweep_catalog".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    let keys: Vec<&str> = catalog.keys().collect();
    if keys.is_empty() {
        results.push(TestResult {
            name: "sweep_catalog".into(),
            passed: false,
            detail: "catalog has no items to sweep with".into(),
        });
        return results;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let layouts = [config.player, config.loot_crate, config.warehouse];
    let (mut placed, mut rearranged, mut rejected) = (0u32, 0u32, 0u32);
    let mut violations = Vec::new();
    let mut next_id = 1u32;
    let mut spawn = |rng: &mut StdRng| {
        let key = keys[rng.gen_range(0..keys.len())];
        next_id += 1;
        catalog.instantiate(key, ItemId(next_id)).ok()
    };

    for round in 0..SWEEP_ROUNDS {
        let layout = layouts[round as usize % layouts.len()];
        let mut inv = Inventory::new(layout);
        let mut misses = 0;
        while misses < 4 {
            match spawn(&mut rng) {
                Some(item) if inv.stow(item.clone()).is_ok() => {}
                _ => misses += 1,
            }
        }

        let Some(dragged) = spawn(&mut rng) else {
            continue;
        };
        let x = rng.gen_range(0..layout.width as i32);
        let y = rng.gen_range(0..layout.height as i32);
        let rotation = Rotation::ALL[rng.gen_range(0..4)];
        let before = inv.clone();

        let first = find_arrangement(inv.items(), &dragged.placed(x, y, rotation), x, y, &layout);
        let second = find_arrangement(inv.items(), &dragged.placed(x, y, rotation), x, y, &layout);
        if first != second {
            violations.push(format!("round {round}: arrangement not deterministic"));
        }

        match inv.drop_item(dragged.clone(), x, y, rotation) {
            Ok(outcome) => {
                match outcome {
                    DropOutcome::Placed => placed += 1,
                    DropOutcome::Rearranged { .. } => rearranged += 1,
                }
                let problems = inv.check_consistency();
                if !problems.is_empty() {
                    violations.push(format!("round {round}: {:?}", problems));
                }
                let landed = inv.get(dragged.id).map(|i| (i.x, i.y, i.rotation));
                if landed != Some((x, y, rotation)) {
                    violations.push(format!("round {round}: dragged item landed at {:?}", landed));
                }
            }
            Err(_) => {
                rejected += 1;
                if inv != before {
                    violations.push(format!("round {round}: rejected drop changed the inventory"));
                }
            }
        }
    }

    results.push(TestResult {
        name: "sweep_invariants".into(),
        passed: violations.is_empty(),
        detail: if violations.is_empty() {
            format!(
                "{} rounds: {} placed, {} rearranged, {} rejected",
                SWEEP_ROUNDS, placed, rearranged, rejected
            )
        } else {
            format!("{} violations, first: {}", violations.len(), violations[0])
        },
    });

    if verbose {
        for v in violations.iter().skip(1).take(10) {
            println!("    {v}");
        }
    }

    results
}
