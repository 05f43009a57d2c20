// Definition-list layout of the plugin list.
// Used for PDF output, where the table would be far too wide for the page.

use crate::plugin::PluginInfo;

/// One definition entry per plugin, concatenated.
pub fn plugin_definitions(plugins: &[PluginInfo]) -> String {
    plugins.iter().map(plugin_definition).collect()
}

fn plugin_definition(plugin: &PluginInfo) -> String {
    let summary_line = if plugin.summary.trim().is_empty() {
        String::new()
    } else {
        format!("   {}", plugin.summary)
    };

    format!(
        "\n{}\n   *last release*: {},\n   *status*: {},\n   *requires*: {}\n\n{}\n",
        plugin.name, plugin.last_release, plugin.status, plugin.requires, summary_line
    )
}
