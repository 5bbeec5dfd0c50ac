//! Input discovery and the in-memory asset set shared by every card.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::config::SuitPolicy;
use crate::error::{DeckError, DeckResult};
use crate::geometry::{DeckGeometry, Suit};
use crate::graphics::{RankFont, SuitExtractor, TrueTypeFont};

/// One mandatory input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssetKind {
    Back,
    Front,
    Suit(Suit),
    Font,
}

impl AssetKind {
    pub const ALL: [AssetKind; 7] = [
        AssetKind::Back,
        AssetKind::Front,
        AssetKind::Suit(Suit::Heart),
        AssetKind::Suit(Suit::Diamond),
        AssetKind::Suit(Suit::Club),
        AssetKind::Suit(Suit::Spade),
        AssetKind::Font,
    ];

    /// Glob pattern the file name must match.
    pub fn pattern(self) -> String {
        match self {
            AssetKind::Back => "im-back*.png".to_string(),
            AssetKind::Front => "im-front*.png".to_string(),
            AssetKind::Suit(suit) => format!("suit-{}*.png", suit.asset_name()),
            AssetKind::Font => "*.ttf".to_string(),
        }
    }
}

/// The chosen file for every mandatory pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAssets {
    pub back: PathBuf,
    pub front: PathBuf,
    pub suits: BTreeMap<Suit, PathBuf>,
    pub font: PathBuf,
}

/// Finds the mandatory inputs in a folder.
///
/// Each pattern resolves to the lexicographically greatest matching file
/// name (byte order), so `suit-heart2.png` wins over `suit-heart1.png` and
/// dated iterations pick the newest.
pub struct AssetResolver<'a> {
    folder: &'a Path,
}

impl<'a> AssetResolver<'a> {
    pub fn new(folder: &'a Path) -> Self {
        Self { folder }
    }

    /// Every file name matching `pattern`, sorted ascending.
    pub fn matches(&self, pattern: &str) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.folder) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| glob_match(pattern, name))
            .collect();
        names.sort();
        names
    }

    /// Check all seven patterns, reporting every missing one at once.
    pub fn resolve(&self) -> DeckResult<ResolvedAssets> {
        let mut chosen: BTreeMap<AssetKind, PathBuf> = BTreeMap::new();
        let mut missing = Vec::new();
        for kind in AssetKind::ALL {
            let pattern = kind.pattern();
            let names = self.matches(&pattern);
            if kind == AssetKind::Font {
                debug!(fonts = ?names, "available fonts");
            }
            match names.last() {
                Some(latest) => {
                    let path = self.folder.join(latest);
                    debug!(pattern = %pattern, file = %path.display(), "resolved asset");
                    chosen.insert(kind, path);
                }
                None => missing.push(pattern),
            }
        }
        if !missing.is_empty() {
            return Err(DeckError::MissingAssets {
                patterns: missing,
                folder: std::path::absolute(self.folder)
                    .unwrap_or_else(|_| self.folder.to_path_buf()),
            });
        }

        let mut take = |kind: AssetKind| chosen.remove(&kind).unwrap_or_default();
        Ok(ResolvedAssets {
            back: take(AssetKind::Back),
            front: take(AssetKind::Front),
            suits: Suit::ALL
                .into_iter()
                .map(|suit| (suit, take(AssetKind::Suit(suit))))
                .collect(),
            font: take(AssetKind::Font),
        })
    }
}

impl ResolvedAssets {
    /// Decode every file and process the suit glyphs. Suits are extracted
    /// before the font is read, in canonical suit order.
    pub fn load(&self, geometry: &DeckGeometry, policy: SuitPolicy) -> DeckResult<AssetSet> {
        self.load_with_font(geometry, policy, |path, size| {
            let font: Box<dyn RankFont> = Box::new(TrueTypeFont::from_file(path, size)?);
            Ok(font)
        })
    }

    /// Like [`ResolvedAssets::load`], with the resolved font file opened by
    /// `open_font` at the configured pixel size.
    pub fn load_with_font<F>(
        &self,
        geometry: &DeckGeometry,
        policy: SuitPolicy,
        open_font: F,
    ) -> DeckResult<AssetSet>
    where
        F: FnOnce(&Path, u32) -> DeckResult<Box<dyn RankFont>>,
    {
        let back = open_image(&self.back)?;
        let front = open_image(&self.front)?;

        let extractor = SuitExtractor::new(geometry, policy);
        let mut suits = BTreeMap::new();
        for (suit, path) in &self.suits {
            let source = open_image(path)?;
            suits.insert(*suit, extractor.extract(*suit, &source)?);
        }

        let font = open_font(&self.font, geometry.font_size)?;
        AssetSet::new(geometry, back, front, suits, font)
    }
}

/// Create the output folder and any missing parents.
pub fn ensure_output_folder(path: &Path) -> DeckResult<()> {
    fs::create_dir_all(path).map_err(|source| DeckError::OutputFolder {
        path: path.to_path_buf(),
        source,
    })
}

fn open_image(path: &Path) -> DeckResult<DynamicImage> {
    image::open(path).map_err(|err| DeckError::AssetLoad {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Everything needed to render cards: half-card artwork, one processed glyph
/// per suit, and the rank font.
pub struct AssetSet {
    back: RgbaImage,
    front: RgbaImage,
    suits: Vec<RgbaImage>,
    font: Box<dyn RankFont>,
}

impl AssetSet {
    /// Build from decoded parts, resizing the artwork to half-card size.
    /// Fails if any suit glyph is absent.
    pub fn new(
        geometry: &DeckGeometry,
        back: DynamicImage,
        front: DynamicImage,
        mut suits: BTreeMap<Suit, RgbaImage>,
        font: Box<dyn RankFont>,
    ) -> DeckResult<Self> {
        let mut glyphs = Vec::with_capacity(Suit::ALL.len());
        for suit in Suit::ALL {
            let glyph = suits.remove(&suit).ok_or_else(|| DeckError::SuitExtraction {
                suit,
                reason: "no glyph supplied".to_string(),
            })?;
            glyphs.push(glyph);
        }

        let (width, height) = geometry.half_card_size();
        Ok(Self {
            back: to_half_card(back, width, height),
            front: to_half_card(front, width, height),
            suits: glyphs,
            font,
        })
    }

    pub fn back(&self) -> &RgbaImage {
        &self.back
    }

    pub fn front(&self) -> &RgbaImage {
        &self.front
    }

    pub fn suit_glyph(&self, suit: Suit) -> &RgbaImage {
        &self.suits[suit as usize]
    }

    pub fn font(&self) -> &dyn RankFont {
        self.font.as_ref()
    }
}

fn to_half_card(image: DynamicImage, width: u32, height: u32) -> RgbaImage {
    if image.width() == width && image.height() == height {
        return image.to_rgba8();
    }
    image
        .resize_exact(width, height, FilterType::CatmullRom)
        .to_rgba8()
}

/// Shell-style wildcard match where `*` spans any run of characters.
/// Hidden files only match patterns that start with a dot.
fn glob_match(pattern: &str, name: &str) -> bool {
    if name.starts_with('.') && !pattern.starts_with('.') {
        return false;
    }
    let mut parts = pattern.split('*');
    let Some(head) = parts.next() else {
        return name.is_empty();
    };
    let Some(mut rest) = name.strip_prefix(head) else {
        return false;
    };
    let tail: Vec<&str> = parts.collect();
    let Some((last, middle)) = tail.split_last() else {
        return rest.is_empty();
    };
    for piece in middle {
        match rest.find(piece) {
            Some(at) => rest = &rest[at + piece.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static SCRATCH: AtomicUsize = AtomicUsize::new(0);

    fn scratch_dir(tag: &str) -> PathBuf {
        let n = SCRATCH.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "cardforge-assets-{}-{}-{}",
            tag,
            std::process::id(),
            n
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    const FULL_SET: [&str; 7] = [
        "im-back.png",
        "im-front.png",
        "suit-heart.png",
        "suit-diamond.png",
        "suit-club.png",
        "suit-spades.png",
        "Roboto.ttf",
    ];

    #[test]
    fn glob_patterns() {
        assert!(glob_match("im-back*.png", "im-back.png"));
        assert!(glob_match("im-back*.png", "im-back-2024-05.png"));
        assert!(!glob_match("im-back*.png", "im-back.jpg"));
        assert!(!glob_match("im-back*.png", "xim-back.png"));
        assert!(glob_match("*.ttf", "Roboto-Bold.ttf"));
        assert!(!glob_match("*.ttf", ".hidden.ttf"));
        assert!(!glob_match("suit-club*.png", "suit-clu.png"));
        assert!(glob_match("a*b*c", "a-xx-b-yy-c"));
    }

    #[test]
    fn resolves_latest_match() {
        let dir = scratch_dir("latest");
        touch(&dir, &FULL_SET);
        touch(&dir, &["suit-heart2.png", "suit-heart10.png", "Zilla.ttf"]);
        let resolved = AssetResolver::new(&dir).resolve().unwrap();
        // Byte-wise ordering: "2" sorts after "10", and both after ".png".
        assert_eq!(resolved.suits[&Suit::Heart], dir.join("suit-heart2.png"));
        assert_eq!(resolved.suits[&Suit::Spade], dir.join("suit-spades.png"));
        assert_eq!(resolved.font, dir.join("Zilla.ttf"));
        assert_eq!(resolved.back, dir.join("im-back.png"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn reports_every_missing_pattern() {
        let dir = scratch_dir("missing");
        touch(&dir, &["im-back.png", "suit-heart.png", "suit-club.png"]);
        match AssetResolver::new(&dir).resolve() {
            Err(DeckError::MissingAssets { patterns, folder }) => {
                assert_eq!(
                    patterns,
                    vec![
                        "im-front*.png".to_string(),
                        "suit-diamond*.png".to_string(),
                        "suit-spades*.png".to_string(),
                        "*.ttf".to_string(),
                    ]
                );
                assert!(folder.is_absolute());
            }
            other => panic!("expected missing assets, got {other:?}"),
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn nonexistent_folder_misses_everything() {
        let dir = std::env::temp_dir().join("cardforge-assets-does-not-exist");
        let err = AssetResolver::new(&dir).resolve().unwrap_err();
        match err {
            DeckError::MissingAssets { patterns, .. } => assert_eq!(patterns.len(), 7),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn output_folder_is_created_recursively() {
        let dir = scratch_dir("output");
        let nested = dir.join("a").join("b");
        ensure_output_folder(&nested).unwrap();
        assert!(nested.is_dir());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn output_folder_under_a_file_fails() {
        let dir = scratch_dir("blocked");
        touch(&dir, &["occupied"]);
        let err = ensure_output_folder(&dir.join("occupied").join("out")).unwrap_err();
        assert!(matches!(err, DeckError::OutputFolder { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_assets() {
        let dir = scratch_dir("symlink");
        let shared = scratch_dir("symlink-shared");
        touch(&shared, &["spade-art.png"]);
        touch(&dir, &FULL_SET[..5]);
        touch(&dir, &["Roboto.ttf"]);
        std::os::unix::fs::symlink(shared.join("spade-art.png"), dir.join("suit-spades.png"))
            .unwrap();

        let resolved = AssetResolver::new(&dir).resolve().unwrap();
        assert_eq!(resolved.suits[&Suit::Spade], dir.join("suit-spades.png"));
        fs::remove_dir_all(&dir).ok();
        fs::remove_dir_all(&shared).ok();
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_missing() {
        let dir = scratch_dir("dangling");
        touch(&dir, &FULL_SET[..5]);
        touch(&dir, &["Roboto.ttf"]);
        std::os::unix::fs::symlink(dir.join("gone.png"), dir.join("suit-spades.png")).unwrap();

        match AssetResolver::new(&dir).resolve() {
            Err(DeckError::MissingAssets { patterns, .. }) => {
                assert_eq!(patterns, vec!["suit-spades*.png".to_string()]);
            }
            other => panic!("expected missing assets, got {other:?}"),
        }
        fs::remove_dir_all(&dir).ok();
    }

    fn small_geometry() -> DeckGeometry {
        DeckGeometry {
            card_size: (20, 10),
            suit_size: (6, 6),
            font_size: 7,
            ..DeckGeometry::default()
        }
    }

    fn block_font(_: &Path, size: u32) -> DeckResult<Box<dyn RankFont>> {
        Ok(Box::new(crate::graphics::BlockFont::new(size)))
    }

    #[test]
    fn artwork_is_resized_to_half_card() {
        let geometry = small_geometry();
        let art = |color| DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, color));
        let suits: BTreeMap<Suit, RgbaImage> = Suit::ALL
            .into_iter()
            .map(|suit| (suit, RgbaImage::new(3, 3)))
            .collect();
        let set = AssetSet::new(
            &geometry,
            art(image::Rgba([0, 0, 120, 255])),
            art(image::Rgba([250, 250, 250, 255])),
            suits,
            Box::new(crate::graphics::BlockFont::new(7)),
        )
        .unwrap();
        assert_eq!(set.back().dimensions(), geometry.half_card_size());
        assert_eq!(set.front().dimensions(), geometry.half_card_size());
        assert_eq!(set.back().dimensions(), (10, 10));
    }

    #[test]
    fn loads_resolved_files_from_disk() {
        let dir = scratch_dir("load");
        let geometry = small_geometry();
        RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 120, 255]))
            .save(dir.join("im-back.png"))
            .unwrap();
        RgbaImage::from_pixel(12, 4, image::Rgba([250, 250, 250, 255]))
            .save(dir.join("im-front.png"))
            .unwrap();
        for suit in Suit::ALL {
            RgbaImage::from_pixel(5, 5, image::Rgba([255, 255, 255, 255]))
                .save(dir.join(format!("suit-{}.png", suit.asset_name())))
                .unwrap();
        }
        touch(&dir, &["Card.ttf"]);

        let resolved = AssetResolver::new(&dir).resolve().unwrap();
        let policy = SuitPolicy::Recolor {
            recolor: true,
            scale: 1.0,
        };
        let set = resolved
            .load_with_font(&geometry, policy, block_font)
            .unwrap();

        assert_eq!(set.back().dimensions(), (10, 10));
        assert_eq!(set.front().dimensions(), (10, 10));
        assert_eq!(set.font().pixel_size(), 7);
        for suit in Suit::ALL {
            let glyph = set.suit_glyph(suit);
            assert_eq!(glyph.dimensions(), (5, 5));
            assert_eq!(*glyph.get_pixel(2, 2), geometry.suit_color(suit));
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn undecodable_image_is_an_asset_error() {
        let dir = scratch_dir("undecodable");
        touch(&dir, &FULL_SET);
        let resolved = AssetResolver::new(&dir).resolve().unwrap();
        let policy = SuitPolicy::Recolor {
            recolor: true,
            scale: 1.0,
        };
        match resolved.load_with_font(&small_geometry(), policy, block_font) {
            Err(DeckError::AssetLoad { path, .. }) => assert_eq!(path, dir.join("im-back.png")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("empty files must not decode"),
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn asset_set_requires_all_suits() {
        let geometry = DeckGeometry {
            card_size: (20, 10),
            ..DeckGeometry::default()
        };
        let art = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        let mut suits = BTreeMap::new();
        suits.insert(Suit::Heart, RgbaImage::new(2, 2));
        let err = AssetSet::new(
            &geometry,
            art.clone(),
            art,
            suits,
            Box::new(crate::graphics::BlockFont::new(7)),
        )
        .err();
        assert!(matches!(
            err,
            Some(DeckError::SuitExtraction {
                suit: Suit::Diamond,
                ..
            })
        ));
    }
}
