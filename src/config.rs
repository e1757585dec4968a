use anyhow::{Context, Result, anyhow};
use directories::UserDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    pub name: Option<String>,
}

/// Gesture tuning, in viewport pixels and degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Movement that arms the angle classifier.
    pub small_px: f32,
    /// Movement that arms the ratio fallback; also the drag threshold.
    pub main_px: f32,
    /// Horizontal travel that commits one step.
    pub commit_px: f32,
    pub max_angle_deg: f32,
    pub touch_ratio: f32,
    pub pointer_ratio: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            small_px: 5.0,
            main_px: 10.0,
            commit_px: 60.0,
            max_angle_deg: 45.0,
            touch_ratio: 2.0,
            pointer_ratio: 2.5,
        }
    }
}

/// Per-carousel partial override of [`Thresholds`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdOverrides {
    pub small_px: Option<f32>,
    pub main_px: Option<f32>,
    pub commit_px: Option<f32>,
    pub max_angle_deg: Option<f32>,
    pub touch_ratio: Option<f32>,
    pub pointer_ratio: Option<f32>,
}

impl Thresholds {
    pub fn with_overrides(&self, o: &ThresholdOverrides) -> Thresholds {
        Thresholds {
            small_px: o.small_px.unwrap_or(self.small_px),
            main_px: o.main_px.unwrap_or(self.main_px),
            commit_px: o.commit_px.unwrap_or(self.commit_px),
            max_angle_deg: o.max_angle_deg.unwrap_or(self.max_angle_deg),
            touch_ratio: o.touch_ratio.unwrap_or(self.touch_ratio),
            pointer_ratio: o.pointer_ratio.unwrap_or(self.pointer_ratio),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    pub duration_ms: u64,
    pub easing: String,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            duration_ms: 400,
            easing: "cubic-bezier(.4,1.3,.5,1)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotStyle {
    pub size_px: u32,
    pub gap_px: u32,
    pub active_color: String,
    pub inactive_color: String,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self {
            size_px: 8,
            gap_px: 8,
            active_color: "#20b2aa".to_string(),
            inactive_color: "#ccc".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    /// Real card (0-based) centered once images have loaded.
    pub start_card: usize,
}

impl Default for Placement {
    fn default() -> Self {
        Self { start_card: 1 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub meta: Meta,
    pub thresholds: Thresholds,
    #[serde(default)]
    pub animation: Animation,
    #[serde(default)]
    pub dots: DotStyle,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default, rename = "carousel")]
    pub overrides: HashMap<String, ThresholdOverrides>,
}

impl Profile {
    /// Effective thresholds for one carousel instance.
    pub fn thresholds_for(&self, id: &str) -> Thresholds {
        match self.overrides.get(id) {
            Some(o) => self.thresholds.with_overrides(o),
            None => self.thresholds.clone(),
        }
    }

    pub fn parse(txt: &str) -> Result<Profile> {
        let profile: Profile = toml::from_str(txt)?;
        validate_profile(&profile)?;
        Ok(profile)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigState {
    pub active_name: String,
    pub profile: Profile,
    pub config_dir: PathBuf,
    pub profiles_dir: PathBuf,
    pub active_ptr: PathBuf,
}

fn config_dir() -> Result<PathBuf> {
    let dirs = UserDirs::new().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(dirs.home_dir().join(".config").join("swipedeck"))
}

fn default_profile_text() -> &'static str {
    include_str!("../profiles/default.toml")
}

impl ConfigState {
    pub fn load_or_install_default() -> Result<Self> {
        Self::load_or_install_in(&config_dir()?)
    }

    pub fn load_or_install_in(cfgdir: &Path) -> Result<Self> {
        let profdir = cfgdir.join("profiles");
        fs::create_dir_all(&profdir)
            .with_context(|| format!("failed to create {}", profdir.display()))?;

        let def_path = profdir.join("default.toml");
        if !def_path.exists() {
            fs::write(&def_path, default_profile_text())?;
            info!("installed default profile at {}", def_path.display());
        }

        let active_ptr = cfgdir.join("active");
        if !active_ptr.exists() {
            let mut f = fs::File::create(&active_ptr)?;
            f.write_all(b"default")?;
        }

        let mut active_name = fs::read_to_string(&active_ptr)?.trim().to_string();
        if active_name.is_empty() {
            warn!("active profile pointer is empty; using 'default'");
            active_name = "default".to_string();
        }
        let profile = load_profile(&profdir, &active_name)?;

        Ok(Self {
            active_name,
            profile,
            config_dir: cfgdir.to_path_buf(),
            profiles_dir: profdir,
            active_ptr,
        })
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        let p = self.profiles_dir.join(format!("{name}.toml"));
        if !p.exists() {
            return Err(anyhow!("profile not found: {}", p.display()));
        }
        // validate before moving the pointer
        let profile = load_profile(&self.profiles_dir, name)?;
        fs::write(&self.active_ptr, name.as_bytes())?;
        self.active_name = name.to_string();
        self.profile = profile;
        info!("switched active profile to '{name}'");
        Ok(())
    }

    /// Load a named profile without activating it.
    pub fn profile_named(&self, name: &str) -> Result<Profile> {
        load_profile(&self.profiles_dir, name)
    }

    pub fn list_profiles(&self) -> Vec<String> {
        let mut v = Vec::new();
        if let Ok(rd) = fs::read_dir(&self.profiles_dir) {
            for e in rd.flatten() {
                let path = e.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        v.push(stem.to_string());
                    }
                }
            }
        }
        v.sort();
        v
    }

    pub fn doctor_report(&self) -> serde_json::Value {
        let mut problems = Vec::new();
        for name in self.list_profiles() {
            if let Err(e) = load_profile(&self.profiles_dir, &name) {
                problems.push(format!("{name}: {e}"));
            }
        }
        let mut overridden: Vec<_> = self.profile.overrides.keys().cloned().collect();
        overridden.sort();
        serde_json::json!({
            "config_dir": self.config_dir,
            "profiles_dir": self.profiles_dir,
            "active_profile": self.active_name,
            "profiles": self.list_profiles(),
            "invalid_profiles": problems,
            "thresholds": self.profile.thresholds,
            "overridden_carousels": overridden,
        })
    }
}

fn load_profile(dir: &Path, name: &str) -> Result<Profile> {
    let path = dir.join(format!("{name}.toml"));
    let txt = fs::read_to_string(&path)
        .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
    Profile::parse(&txt).map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))
}

fn validate_thresholds(scope: &str, t: &Thresholds) -> Result<()> {
    let all = [
        t.small_px,
        t.main_px,
        t.commit_px,
        t.max_angle_deg,
        t.touch_ratio,
        t.pointer_ratio,
    ];
    if all.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(anyhow!("{scope}: thresholds must be positive numbers"));
    }
    if t.small_px > t.main_px {
        return Err(anyhow!("{scope}: small_px must not exceed main_px"));
    }
    if t.main_px >= t.commit_px {
        return Err(anyhow!("{scope}: commit_px must exceed main_px"));
    }
    if t.max_angle_deg >= 90.0 {
        return Err(anyhow!("{scope}: max_angle_deg must be in (0,90)"));
    }
    if t.touch_ratio < 1.0 || t.pointer_ratio < 1.0 {
        return Err(anyhow!("{scope}: axis ratios must be >= 1"));
    }
    Ok(())
}

fn validate_profile(p: &Profile) -> Result<()> {
    validate_thresholds("thresholds", &p.thresholds)?;
    for id in p.overrides.keys() {
        if id.trim().is_empty() {
            return Err(anyhow!("empty carousel id in overrides"));
        }
        validate_thresholds(&format!("carousel.{id}"), &p.thresholds_for(id))?;
    }
    if p.animation.duration_ms == 0 {
        return Err(anyhow!("animation.duration_ms must be positive"));
    }
    if p.animation.easing.trim().is_empty() {
        return Err(anyhow!("animation.easing must not be empty"));
    }
    Ok(())
}
