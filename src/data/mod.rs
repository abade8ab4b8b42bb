/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  directory of 712_*.tif / 711_*.tif
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  probe prefix + ".tif" → decode → ImageCollection
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ ImageCollection │  file name → pixel array, directory order
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  timepoint / metabolite selection → visible names
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
