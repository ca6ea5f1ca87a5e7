//! Summary counts printed by `--stats`.

use pagesmith::page::breakpoints::get_overridden_breakpoints;
use pagesmith::{Breakpoint, GroupIndex, Page};

/// Counts gathered from a page before resolution.
#[derive(Debug, Default)]
pub struct PageStats {
    pub sections: usize,
    pub items: usize,
    pub elements: usize,
    pub hidden_at_tier: usize,
    pub tablet_overrides: usize,
    pub mobile_overrides: usize,
    pub groups: usize,
}

impl PageStats {
    /// Collects counts from `page` and its resolved form.
    pub fn collect(page: &Page, groups: &GroupIndex, resolved: &Page) -> Self {
        let mut stats = PageStats {
            sections: page.sections.len(),
            items: page.sections.iter().map(|s| s.items.len()).sum(),
            groups: groups.len(),
            ..Default::default()
        };
        for element in page.elements() {
            stats.elements += 1;
            for tier in get_overridden_breakpoints(element) {
                match tier {
                    Breakpoint::Tablet => stats.tablet_overrides += 1,
                    Breakpoint::Mobile => stats.mobile_overrides += 1,
                    Breakpoint::Desktop => {}
                }
            }
        }
        stats.hidden_at_tier = resolved.elements().filter(|e| !e.visible).count();
        stats
    }

    pub fn print(&self, title: &str, tier: Breakpoint, input_bytes: usize, output_bytes: usize) {
        println!();
        println!("Resolution statistics:");
        println!("  Title:      {}", title);
        println!("  Breakpoint: {}", tier);
        println!();
        println!("  Input JSON:  {:>10} bytes", input_bytes);
        println!("  Output JSON: {:>10} bytes", output_bytes);
        println!();
        println!("  Sections: {}", self.sections);
        println!("  Items:    {}", self.items);
        println!("  Elements: {}", self.elements);
        println!("  Groups:   {}", self.groups);
        println!();
        println!("  Tablet overrides: {}", self.tablet_overrides);
        println!("  Mobile overrides: {}", self.mobile_overrides);
        println!("  Hidden at {}: {}", tier, self.hidden_at_tier);
    }
}
