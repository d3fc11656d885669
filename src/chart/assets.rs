/// Embedded web assets for the chart visualization.
///
/// The page owns everything browser-side: the cluster layout,
/// bundled splines, hover highlighting, tooltip and resize handling. The
/// Rust side only supplies the payload, either over `/api/chart` or inlined
/// through [`CHART_DATA_PLACEHOLDER`] for static export.

/// Replaced with the serialized `ChartData` when exporting static HTML.
pub const CHART_DATA_PLACEHOLDER: &str = "/*__CHART_DATA__*/null";

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Bundlemap</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: #1a1a2e;
            color: #eee;
            overflow: hidden;
        }

        #container {
            display: flex;
            height: 100vh;
        }

        #chart {
            flex: 1;
        }

        #sidebar {
            width: 280px;
            background: #1a1a2e;
            border-left: 1px solid #333;
            padding: 20px;
            overflow-y: auto;
        }

        h1 {
            font-size: 1.4em;
            margin-bottom: 10px;
            color: #00d9ff;
        }

        h2 {
            font-size: 1.1em;
            margin: 15px 0 10px;
            color: #888;
            text-transform: uppercase;
            letter-spacing: 1px;
        }

        .stat {
            display: flex;
            justify-content: space-between;
            padding: 8px 0;
            border-bottom: 1px solid #333;
        }

        .stat-value {
            color: #00d9ff;
            font-weight: bold;
        }

        .legend {
            display: flex;
            flex-direction: column;
            gap: 8px;
            margin-top: 15px;
        }

        .legend-item {
            display: flex;
            align-items: center;
            gap: 8px;
            font-size: 0.9em;
        }

        .legend-color {
            width: 14px;
            height: 14px;
            border-radius: 3px;
        }

        .node text {
            cursor: pointer;
            fill: #eee;
        }

        .link {
            fill: none;
        }

        .node-bar {
            cursor: pointer;
        }

        .tooltip {
            position: absolute;
            pointer-events: none;
            background: #16213e;
            border: 1px solid #00d9ff;
            border-radius: 4px;
            padding: 6px 10px;
            font-size: 0.85em;
            z-index: 10;
        }
    </style>
</head>
<body>
    <div id="container">
        <div id="chart"></div>
        <div id="sidebar">
            <h1>Bundlemap</h1>

            <h2>Summary</h2>
            <div id="stats">
                <div class="stat">
                    <span>Records</span>
                    <span class="stat-value" id="stat-records">-</span>
                </div>
                <div class="stat">
                    <span>Groups</span>
                    <span class="stat-value" id="stat-groups">-</span>
                </div>
                <div class="stat">
                    <span>Leaves</span>
                    <span class="stat-value" id="stat-leaves">-</span>
                </div>
                <div class="stat">
                    <span>Links</span>
                    <span class="stat-value" id="stat-links">-</span>
                </div>
            </div>

            <h2>Groups</h2>
            <div class="legend" id="legend"></div>
        </div>
    </div>

    <style id="chart-style"></style>

    <script>
        const EMBEDDED = /*__CHART_DATA__*/null;

        const palette = ['#4ecdc4', '#ff6b6b', '#ffe66d', '#c9b1ff',
                         '#95e1d3', '#f38181', '#6c5ce7', '#74b9ff'];

        // Highest generation applied so far; older payloads are dropped.
        let appliedGeneration = -1;

        async function loadData() {
            if (EMBEDDED) return EMBEDDED;
            const response = await fetch('/api/chart');
            return await response.json();
        }

        async function refresh() {
            const data = await loadData();
            if (data.metadata.generation < appliedGeneration) return;
            appliedGeneration = data.metadata.generation;
            updateSidebar(data);
            render(data);
        }

        function init() {
            refresh();
            // One listener per page load. A resize reruns the whole pipeline
            // against the freshest data (refetched unless embedded).
            window.addEventListener('resize', refresh);
            if (!EMBEDDED && window.EventSource) {
                const events = new EventSource('/api/events');
                events.onmessage = refresh;
            }
        }

        function groupColor(style, key, index) {
            return style.group_colors[key] || palette[index % palette.length];
        }

        function updateSidebar(data) {
            document.getElementById('stat-records').textContent = data.metadata.record_count;
            document.getElementById('stat-groups').textContent = data.metadata.group_columns.length;
            document.getElementById('stat-leaves').textContent = data.metadata.leaf_count;
            document.getElementById('stat-links').textContent = data.metadata.link_count;

            const legend = document.getElementById('legend');
            legend.innerHTML = '';
            data.root.children.forEach((group, i) => {
                const item = document.createElement('div');
                item.className = 'legend-item';
                const swatch = document.createElement('div');
                swatch.className = 'legend-color';
                swatch.style.background = groupColor(data.style, group.key, i);
                const name = document.createElement('span');
                name.textContent = group.display || group.key;
                item.appendChild(swatch);
                item.appendChild(name);
                legend.appendChild(item);
            });
        }

        function injectStyle(s) {
            document.getElementById('chart-style').textContent = `
                body { background: ${s.background}; }
                .node text {
                    font-size: ${s.font_size}px;
                    font-weight: ${s.font_weight};
                }
                .node, .node-bar { opacity: 1; }
                .node-bg { opacity: ${s.opacity_background}; }
                .node-source text, .node-target text { font-weight: bold; }
                .node-bar { opacity: ${s.opacity_default}; }
                .node-bar-source, .node-bar-target { opacity: ${s.opacity_highlight}; }
                .node-bar-bg { opacity: ${s.opacity_background}; }
                .link { stroke: ${s.link_color}; opacity: ${s.opacity_default}; }
                .link-source, .link-target { opacity: ${s.opacity_highlight}; }
                .link-bg { opacity: ${s.opacity_background}; }
            `;
        }

        function render(data) {
            const s = data.style;
            injectStyle(s);

            const container = document.getElementById('chart');
            container.innerHTML = '';

            const width = container.clientWidth;
            const height = container.clientHeight;
            const innerRadius = Math.max(
                60, Math.min(width, height) / 2 - s.label_width - s.bar_height);

            const svg = d3.select('#chart')
                .append('svg')
                .attr('width', width)
                .attr('height', height);

            const g = svg.append('g')
                .attr('transform', `translate(${width / 2},${height / 2})`);

            const rootNode = d3.hierarchy(data.root);
            d3.cluster().size([s.angle_span, innerRadius])(rootNode);

            const leafById = new Map();
            rootNode.leaves().forEach(leaf => leafById.set(leaf.data.id, leaf));

            const groupIndex = new Map();
            data.root.children.forEach((group, i) => groupIndex.set(group.key, i));
            const colorOf = leaf =>
                groupColor(s, leaf.parent.data.key, groupIndex.get(leaf.parent.data.key));

            const barScale = d3.scaleLinear()
                .domain([0, data.metadata.max_leaf_value])
                .range([0, s.bar_height]);
            const widthScale = d3.scaleLinear()
                .domain([0, data.metadata.max_link_value])
                .range([s.link_width_min, s.link_width_max]);

            const line = d3.lineRadial()
                .curve(d3.curveBundle.beta(s.tension))
                .radius(d => d.y)
                .angle(d => d.x * Math.PI / 180);

            // Bundled links, routed through the hierarchy.
            const link = g.append('g')
                .selectAll('path')
                .data(data.links.map(l => ({
                    link: l,
                    path: leafById.get(l.source).path(leafById.get(l.target)),
                })))
                .join('path')
                .attr('class', 'link')
                .attr('d', d => line(d.path))
                .attr('stroke-width', d => widthScale(d.link.value))
                .style('opacity', 0);

            // Fade in, then drop the inline style so the class opacities
            // (default / highlight / background) take over.
            link.transition()
                .delay((d, i) => i * 4)
                .duration(400)
                .style('opacity', s.opacity_default)
                .on('end', function() { d3.select(this).style('opacity', null); });

            // Leaf labels.
            const node = g.append('g')
                .selectAll('g')
                .data(rootNode.leaves())
                .join('g')
                .attr('class', 'node')
                .attr('transform', d =>
                    `rotate(${d.x - 90}) translate(${d.y + s.bar_height + 4},0)`);

            node.append('text')
                .attr('dy', '0.31em')
                .attr('x', d => d.x < 180 ? 4 : -4)
                .attr('text-anchor', d => d.x < 180 ? 'start' : 'end')
                .attr('transform', d => d.x < 180 ? null : 'rotate(180)')
                .text(d => d.data.display)
                .style('opacity', 0)
                .transition()
                .delay((d, i) => i * 8)
                .duration(300)
                .style('opacity', 1);

            // Value bars, one per leaf, length proportional to the aggregate.
            const bar = g.append('g')
                .selectAll('rect')
                .data(rootNode.leaves())
                .join('rect')
                .attr('class', 'node-bar')
                .attr('fill', colorOf)
                .attr('transform', d => `rotate(${d.x - 90}) translate(${d.y},0)`)
                .attr('y', -s.bar_width / 2)
                .attr('height', s.bar_width)
                .attr('width', 0);

            bar.transition()
                .delay((d, i) => i * 8)
                .duration(300)
                .attr('width', d => barScale(d.data.value || 0));

            // Hover state machine: idle -> hovered(d) -> idle.
            function setHover(d) {
                const touched = new Set([d.data.id]);

                link.classed('link-source', l => l.link.source === d.data.id)
                    .classed('link-target', l => l.link.target === d.data.id)
                    .classed('link-bg', l =>
                        l.link.source !== d.data.id && l.link.target !== d.data.id);

                link.filter(l => l.link.source === d.data.id || l.link.target === d.data.id)
                    .raise()
                    .each(l => {
                        touched.add(l.link.source);
                        touched.add(l.link.target);
                    });

                const role = n =>
                    n.data.id === d.data.id ? 'source'
                        : touched.has(n.data.id) ? 'target' : 'bg';

                node.attr('class', n => `node node-${role(n)}`);
                bar.attr('class', n => `node-bar node-bar-${role(n)}`);
            }

            function clearHover() {
                link.classed('link-source', false)
                    .classed('link-target', false)
                    .classed('link-bg', false);
                node.attr('class', 'node');
                bar.attr('class', 'node-bar');
                removeTooltip();
            }

            function removeTooltip() {
                // Defensive purge: a missed pointer-leave must not leak a
                // stale tooltip into the next hover.
                d3.selectAll('.tooltip').remove();
            }

            function showTooltip(event, d) {
                removeTooltip();
                d3.select('body')
                    .append('div')
                    .attr('class', 'tooltip')
                    .style('left', (event.pageX + 10) + 'px')
                    .style('top', (event.pageY - 40) + 'px')
                    .text(`${s.tooltip_label}: ${d.data.value}`);
            }

            function wireHover(selection) {
                selection
                    .on('mouseover', (event, d) => {
                        setHover(d);
                        showTooltip(event, d);
                    })
                    .on('mouseout', clearHover);
            }

            wireHover(node);
            wireHover(bar);

            // Click anywhere outside a node resets all interaction state.
            svg.on('click', clearHover);
        }

        init();
    </script>
</body>
</html>
"##;
