use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::bookmark::{self, Bookmark};
use satchel_core::{ids, io, store};

/// In-memory view of the bookmark store. Mutating operations flip the
/// modified flag; `save_if_modified` only touches the file when something
/// actually changed, so read-only runs never rewrite the store.
pub struct BookmarkManager {
    data: Vec<Bookmark>,
    modified: bool,
    used_ids: HashSet<u32>,
}

impl BookmarkManager {
    pub fn new(data: Vec<Bookmark>) -> Result<Self> {
        let mut used_ids = HashSet::new();
        for bookmark in &data {
            if !used_ids.insert(bookmark.id) {
                bail!(
                    "repeated ID in file: {}; it'll have to be removed manually",
                    bookmark.id
                );
            }
        }

        Ok(BookmarkManager {
            data,
            modified: false,
            used_ids,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = store::load(path).context("failed to load bookmarks file")?;
        Self::new(data)
    }

    pub fn data(&self) -> &[Bookmark] {
        &self.data
    }

    pub fn find(&self, id: u32) -> Option<&Bookmark> {
        self.data.iter().find(|bkmk| bkmk.id == id)
    }

    pub fn find_mut(&mut self, id: u32) -> Option<&mut Bookmark> {
        self.modified = true;
        self.data.iter_mut().find(|bkmk| bkmk.id == id)
    }

    /// URLs count as duplicates with or without a trailing slash, since
    /// both spellings point at the same page.
    pub fn already_has_url(&self, url: &str) -> Option<u32> {
        let find = |needle: &str| {
            self.data
                .iter()
                .find(|bkmk| bkmk.url == needle)
                .map(|bkmk| bkmk.id)
        };

        find(url).or_else(|| match url.strip_suffix('/') {
            Some(stripped) => find(stripped),
            None => find(&format!("{url}/")),
        })
    }

    pub fn add(&mut self, name: String, url: String, tags: Vec<String>) -> Result<u32> {
        if let Some(id) = self.already_has_url(&url) {
            bail!("repeated URL with bookmark #{id} ({url})");
        }

        let id = ids::lowest_free(&self.used_ids);
        self.used_ids.insert(id);
        self.data.push(Bookmark {
            id,
            archived: false,
            name,
            url,
            tags,
        });
        self.modified = true;
        Ok(id)
    }

    /// Add a bookmark, taking its title from the page itself. When the
    /// fetch fails and `prompt` is set, the user gets to type one; empty
    /// input cancels the add.
    pub fn add_from_url(&mut self, url: String, prompt: bool) -> Result<u32> {
        if let Some(id) = self.already_has_url(&url) {
            bail!("repeated URL with bookmark #{id} ({url})");
        }

        let title = match bookmark::fetch_title(&url) {
            Ok(title) => title,
            Err(e) if prompt => {
                eprintln!("Failed to get title: {e:#}");
                eprintln!("  Url: {url:?}");
                let line = io::read_line("  Type a new title (type nothing to cancel): ")
                    .context("failed to read line")?;
                if line.is_empty() {
                    bail!("empty title");
                }
                line
            }
            Err(e) => return Err(e.context("failed to get title")),
        };
        let title = bookmark::clean_title(&title);

        eprintln!("New bookmark: {title:?} ({url:?})");
        self.add(title, url, Vec::new())
    }

    pub fn delete(&mut self, id: u32) -> bool {
        match self.data.iter().position(|bkmk| bkmk.id == id) {
            Some(pos) => {
                self.data.remove(pos);
                self.used_ids.remove(&id);
                self.modified = true;
                true
            }
            None => false,
        }
    }

    pub fn save_if_modified(&self, path: &Path) -> Result<()> {
        if self.modified {
            store::save(path, &self.data).context("failed to save changes to file")?;
        }
        Ok(())
    }
}
